//! Test layer that captures span fields by span name.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

type Fields = Arc<Mutex<HashMap<String, String>>>;

/// Records every field set on spans named `span_name`, at creation or later.
#[derive(Clone)]
pub(crate) struct FieldCapture {
    span_name: &'static str,
    fields: Fields,
}

impl FieldCapture {
    pub(crate) fn new(span_name: &'static str) -> Self {
        Self {
            span_name,
            fields: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub(crate) fn get(&self, field: &str) -> Option<String> {
        self.fields.lock().unwrap().get(field).cloned()
    }
}

struct Collect<'a>(&'a Fields);

impl Visit for Collect<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.lock().unwrap().insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0
            .lock()
            .unwrap()
            .insert(field.name().to_string(), format!("{:?}", value));
    }
}

impl<S> Layer<S> for FieldCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        if attrs.metadata().name() == self.span_name {
            attrs.record(&mut Collect(&self.fields));
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if ctx.span(id).is_some_and(|span| span.name() == self.span_name) {
            values.record(&mut Collect(&self.fields));
        }
    }
}
