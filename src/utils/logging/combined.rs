//! A layer that fans out to a runtime-built list of boxed sub-layers.
//!
//! Each configured output is one `EnvFilter` + fmt pair. An event is wanted when
//! any output wants it, and is then handed only to the outputs whose own filter
//! accepts it, so a verbose output is not muted by a quiet one.
use tracing_core::{
    span,
    subscriber::{Interest, Subscriber},
    Event, Metadata,
};
use tracing_subscriber::layer::{Context, Layer};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

pub struct Fanout<S> {
    outputs: Vec<BoxedLayer<S>>,
}

impl<S> Fanout<S>
where
    S: Subscriber,
{
    /// No outputs, everything is dropped
    pub fn empty() -> Self {
        Self { outputs: vec![] }
    }

    pub fn new<T, L>(iter: T) -> Self
    where
        T: IntoIterator<Item = L>,
        L: Layer<S> + Send + Sync + 'static,
    {
        Self {
            outputs: iter
                .into_iter()
                .map(|l| -> BoxedLayer<S> { Box::new(l) })
                .collect(),
        }
    }
}

impl<S> Layer<S> for Fanout<S>
where
    S: Subscriber,
{
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        let mut always = true;
        let mut never = true;
        for output in self.outputs.iter() {
            let interest = output.register_callsite(metadata);
            always &= interest.is_always();
            never &= interest.is_never();
        }
        if never {
            Interest::never()
        } else if always {
            Interest::always()
        } else {
            Interest::sometimes()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>, ctx: Context<'_, S>) -> bool {
        self.outputs.iter().any(|o| o.enabled(metadata, ctx.clone()))
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            if output.enabled(event.metadata(), ctx.clone()) {
                output.on_event(event, ctx.clone());
            }
        }
    }

    // span bookkeeping goes to every output, fmt layers need the fields of
    // every span an accepted event may sit in

    fn new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.new_span(attrs, id, ctx.clone());
        }
    }

    fn on_record(&self, span: &span::Id, values: &span::Record<'_>, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.on_record(span, values, ctx.clone());
        }
    }

    fn on_follows_from(&self, span: &span::Id, follows: &span::Id, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.on_follows_from(span, follows, ctx.clone());
        }
    }

    fn on_enter(&self, id: &span::Id, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.on_enter(id, ctx.clone());
        }
    }

    fn on_exit(&self, id: &span::Id, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.on_exit(id, ctx.clone());
        }
    }

    fn on_close(&self, id: span::Id, ctx: Context<'_, S>) {
        for output in self.outputs.iter() {
            output.on_close(id.clone(), ctx.clone());
        }
    }
}
