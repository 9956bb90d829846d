use super::Mapper;

use std::{ops::ControlFlow, sync::Arc};

/// Mapper operations that run hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    Load,
    Insert,
    Update,
    Delete,
}

type BeforeFn = Arc<dyn Fn(&Mapper) -> ControlFlow<()> + Send + Sync>;
type AfterFn = Arc<dyn Fn(&Mapper) + Send + Sync>;

#[derive(Clone, Default)]
pub(super) struct Hooks {
    before: Vec<(Event, BeforeFn)>,
    after: Vec<(Event, AfterFn)>,
}

impl Mapper {
    /// Registers a hook run before `event`. Returning
    /// [`ControlFlow::Break`] cancels the operation without an error.
    pub fn before(
        &mut self,
        event: Event,
        f: impl Fn(&Mapper) -> ControlFlow<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.hooks.before.push((event, Arc::new(f)));
        self
    }

    /// Registers a hook run after `event` succeeded.
    pub fn after(&mut self, event: Event, f: impl Fn(&Mapper) + Send + Sync + 'static) -> &mut Self {
        self.hooks.after.push((event, Arc::new(f)));
        self
    }

    /// Runs the before hooks of `event` in registration order, stopping at
    /// the first veto.
    pub(super) fn fire_before(&self, event: Event) -> ControlFlow<()> {
        for (_, hook) in self.hooks.before.iter().filter(|(e, _)| *e == event) {
            if hook(self).is_break() {
                tracing::debug!(table = self.table(), ?event, "vetoed by hook");
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub(super) fn fire_after(&self, event: Event) {
        for (_, hook) in self.hooks.after.iter().filter(|(e, _)| *e == event) {
            hook(self);
        }
    }
}
