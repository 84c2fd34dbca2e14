//! Step Wizard
//!
//! Multi-step form flow (Lånebelopp, Personuppgifter, Bekräfta). Validation
//! rules belong to the application; the wizard takes their result and does
//! the accessible part: marking invalid fields, moving focus to the first
//! one, announcing step changes and keeping hidden steps out of reach.

use bankui_dom::NodeId;

use crate::announcer::Announcer;
use crate::aria::Politeness;
use crate::router::KeyRouter;

/// Announced after a successful submit
pub const SUBMITTED_MESSAGE: &str = "Din låneansökan har skickats!";

/// One step and the container that receives focus when it opens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub name: String,
    pub container: NodeId,
}

impl WizardStep {
    pub fn new(name: impl Into<String>, container: NodeId) -> Self {
        Self { name: name.into(), container }
    }
}

/// Validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: NodeId,
    pub message: String,
}

impl FieldError {
    pub fn new(field: NodeId, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// What a navigation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Validation failed; focus goes to `first_invalid` next frame
    Invalid { first_invalid: NodeId },
    /// Now on step `index`
    Moved { index: usize },
    Submitted,
    /// Already at the boundary (or already submitted)
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct StepWizard {
    steps: Vec<WizardStep>,
    current: usize,
    submitted: bool,
    invalid: Vec<NodeId>,
}

impl StepWizard {
    /// Create the wizard on step 0 and hide every other step
    pub fn new(steps: Vec<WizardStep>, router: &mut KeyRouter) -> Self {
        let wizard = Self {
            steps,
            current: 0,
            submitted: false,
            invalid: Vec::new(),
        };
        wizard.sync_visibility(router);
        wizard
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.steps.get(self.current)
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// "Steg N av M: name"
    pub fn step_label(&self, index: usize) -> Option<String> {
        let step = self.steps.get(index)?;
        Some(format!("Steg {} av {}: {}", index + 1, self.steps.len(), step.name))
    }

    /// Fields currently marked `aria-invalid`
    pub fn invalid_fields(&self) -> &[NodeId] {
        &self.invalid
    }

    /// Advance if the current step validated
    pub fn next(
        &mut self,
        errors: &[FieldError],
        router: &mut KeyRouter,
        announcer: &mut Announcer,
    ) -> StepOutcome {
        if self.submitted {
            return StepOutcome::Unchanged;
        }
        if let Some(outcome) = self.reject(errors, router, announcer) {
            return outcome;
        }
        if self.is_last() {
            return StepOutcome::Unchanged;
        }
        self.move_to(self.current + 1, router, announcer)
    }

    /// Previous step; never validates
    pub fn back(&mut self, router: &mut KeyRouter, announcer: &mut Announcer) -> StepOutcome {
        if self.submitted || self.current == 0 {
            return StepOutcome::Unchanged;
        }
        self.clear_invalid(router);
        self.move_to(self.current - 1, router, announcer)
    }

    /// Submit from the last step
    pub fn submit(
        &mut self,
        errors: &[FieldError],
        router: &mut KeyRouter,
        announcer: &mut Announcer,
    ) -> StepOutcome {
        if self.submitted || !self.is_last() {
            return StepOutcome::Unchanged;
        }
        if let Some(outcome) = self.reject(errors, router, announcer) {
            return outcome;
        }
        self.submitted = true;
        tracing::info!("application submitted");
        announcer.announce(SUBMITTED_MESSAGE, Politeness::Polite);
        StepOutcome::Submitted
    }

    /// Mark errors; `None` when there are none
    fn reject(
        &mut self,
        errors: &[FieldError],
        router: &mut KeyRouter,
        announcer: &mut Announcer,
    ) -> Option<StepOutcome> {
        self.clear_invalid(router);
        let first = errors.first()?;

        for error in errors {
            router
                .adapter_mut()
                .set_attribute(error.field, "aria-invalid", Some("true"));
            self.invalid.push(error.field);
        }
        router.schedule_focus(first.field);
        announcer.announce(&first.message, Politeness::Polite);
        tracing::debug!("step {} rejected with {} errors", self.current, errors.len());
        Some(StepOutcome::Invalid { first_invalid: first.field })
    }

    fn clear_invalid(&mut self, router: &mut KeyRouter) {
        for field in self.invalid.drain(..) {
            router.adapter_mut().set_attribute(field, "aria-invalid", None);
        }
    }

    fn move_to(
        &mut self,
        index: usize,
        router: &mut KeyRouter,
        announcer: &mut Announcer,
    ) -> StepOutcome {
        self.current = index;
        self.sync_visibility(router);
        if let Some(label) = self.step_label(index) {
            announcer.announce(&label, Politeness::Polite);
        }
        router.schedule_focus(self.steps[index].container);
        StepOutcome::Moved { index }
    }

    /// Only the current step is rendered and programmatically focusable
    fn sync_visibility(&self, router: &mut KeyRouter) {
        let adapter = router.adapter_mut();
        for (index, step) in self.steps.iter().enumerate() {
            if index == self.current {
                adapter.set_attribute(step.container, "hidden", None);
                adapter.set_attribute(step.container, "tabindex", Some("-1"));
            } else {
                adapter.set_attribute(step.container, "hidden", Some(""));
                adapter.set_attribute(step.container, "tabindex", None);
            }
        }
    }
}
