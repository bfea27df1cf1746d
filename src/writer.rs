//! Writes one configuration file per expanded document.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{
    codec,
    document::{self, Document},
    error::{Result, SpanError},
    expand::{Plan, Sink},
    key::Key,
    template::Template,
};

/// A [`Sink`] that renders the render set and the output path, then writes
/// the document with the codec matching the path's extension.
pub struct OutputWriter<'a> {
    plan: &'a Plan,
    dry_run: bool,
    generated: Vec<PathBuf>,
    observer: Option<Box<dyn FnMut(&Path) + 'a>>,
}

impl<'a> OutputWriter<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self {
            plan,
            dry_run: false,
            generated: Vec::new(),
            observer: None,
        }
    }

    /// Render paths and fields but do not touch the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Call `f` with every path once it has been written.
    pub fn on_write(mut self, f: impl FnMut(&Path) + 'a) -> Self {
        self.observer = Some(Box::new(f));
        self
    }

    /// Paths generated so far, in generation order.
    pub fn generated(&self) -> &[PathBuf] {
        &self.generated
    }

    /// Replace every render-set value with its rendering, recording the
    /// originals so they can be put back.
    fn render_fields(
        &self,
        doc: &mut Document,
        originals: &mut Vec<(&'a Key, Value)>,
    ) -> Result<()> {
        let plan: &'a Plan = self.plan;
        for key in &plan.render {
            let Value::String(source) = document::get(doc, key)? else {
                return Err(SpanError::ExpectedString(key.clone()));
            };
            let rendered = Template::compile(source)?.render(doc)?;
            let original = document::replace(doc, key, Value::String(rendered))?;
            originals.push((key, original));
        }
        Ok(())
    }

    fn write(&mut self, doc: &Document) -> Result<()> {
        let path = PathBuf::from(self.plan.output.render(doc)?);
        if self.dry_run {
            codec::find_codec(&path)?;
        } else {
            codec::write_document(&path, doc)?;
        }
        if let Some(observer) = self.observer.as_mut() {
            observer(&path);
        }
        self.generated.push(path);
        Ok(())
    }
}

impl Sink for OutputWriter<'_> {
    fn emit(&mut self, doc: &mut Document) -> Result<()> {
        let mut originals = Vec::with_capacity(self.plan.render.len());
        let result = self
            .render_fields(doc, &mut originals)
            .and_then(|()| self.write(doc));

        let mut restored = Ok(());
        for (key, original) in originals.into_iter().rev() {
            restored = restored.and(document::set(doc, key, original));
        }
        result.and(restored)
    }
}
