use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::types::TriggerKind;

/// Snapshot of the sleep/wake bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActivityState {
    pub last_activity_ms: u32,
    pub sleeping: bool,
    pub trap_armed: bool,
}

/// How the activity monitor treated a contact sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactAdmission {
    Admitted,
    /// The sample woke the device and flows through the pipeline.
    WokeAndAdmitted,
    /// The sample woke the device and armed the wake-click trap.
    WokeAndSuppressed,
    /// The trap armed by an earlier wake is still holding this contact.
    Suppressed,
}

impl ContactAdmission {
    pub const fn woke(self) -> bool {
        matches!(self, Self::WokeAndAdmitted | Self::WokeAndSuppressed)
    }

    pub const fn is_suppressed(self) -> bool {
        matches!(self, Self::WokeAndSuppressed | Self::Suppressed)
    }
}

#[derive(Clone, Copy, Debug)]
enum ActivityHsmEvent {
    IdleCheck { now_ms: u32, contact_busy: bool },
    Contact { now_ms: u32 },
    Release,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    trigger: Option<TriggerKind>,
    admission: Option<ContactAdmission>,
}

pub struct ActivityMonitor {
    machine: statig::blocking::StateMachine<ActivityHsm>,
}

impl ActivityMonitor {
    pub fn new(sleep_timeout_ms: u32, suppress_wake_click: bool, now_ms: u32) -> Self {
        Self {
            machine: ActivityHsm::new(sleep_timeout_ms, suppress_wake_click, now_ms)
                .state_machine(),
        }
    }

    /// Falls asleep once the idle time exceeds the timeout. A contact that is
    /// down or arriving this tick keeps the device awake, so a contact that
    /// ends a long gap without idle ticks counts as activity and not as a wake.
    /// Returns the sleep trigger on the tick the transition happens.
    pub fn check_idle(&mut self, now_ms: u32, contact_busy: bool) -> Option<TriggerKind> {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(
            &ActivityHsmEvent::IdleCheck {
                now_ms,
                contact_busy,
            },
            &mut context,
        );
        context.trigger
    }

    /// Registers a contact sample, waking the device if it was asleep.
    pub fn on_contact(&mut self, now_ms: u32) -> ContactAdmission {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ActivityHsmEvent::Contact { now_ms }, &mut context);
        context.admission.unwrap_or(ContactAdmission::Admitted)
    }

    /// The contact was lifted; disarms the wake-click trap.
    pub fn release(&mut self) {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&ActivityHsmEvent::Release, &mut context);
    }

    pub fn state(&self) -> ActivityState {
        self.machine.inner().state
    }
}

struct ActivityHsm {
    sleep_timeout_ms: u32,
    suppress_wake_click: bool,
    state: ActivityState,
}

impl ActivityHsm {
    fn new(sleep_timeout_ms: u32, suppress_wake_click: bool, now_ms: u32) -> Self {
        Self {
            sleep_timeout_ms,
            suppress_wake_click,
            state: ActivityState {
                last_activity_ms: now_ms,
                sleeping: false,
                trap_armed: false,
            },
        }
    }

    fn idle_expired(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.state.last_activity_ms) > self.sleep_timeout_ms
    }
}

#[state_machine(initial = "State::awake()")]
impl ActivityHsm {
    #[state(superstate = "monitored")]
    fn awake(&mut self, context: &mut DispatchContext, event: &ActivityHsmEvent) -> Outcome<State> {
        match event {
            ActivityHsmEvent::IdleCheck {
                now_ms,
                contact_busy,
            } => {
                if *contact_busy || !self.idle_expired(*now_ms) {
                    return Handled;
                }
                log::info!("entering sleep mode");
                self.state.sleeping = true;
                context.trigger = Some(TriggerKind::Sleep);
                Transition(State::asleep())
            }
            ActivityHsmEvent::Contact { now_ms } => {
                self.state.last_activity_ms = *now_ms;
                context.admission = Some(if self.state.trap_armed {
                    ContactAdmission::Suppressed
                } else {
                    ContactAdmission::Admitted
                });
                Handled
            }
            ActivityHsmEvent::Release => Super,
        }
    }

    #[state(superstate = "monitored")]
    fn asleep(&mut self, context: &mut DispatchContext, event: &ActivityHsmEvent) -> Outcome<State> {
        match event {
            ActivityHsmEvent::IdleCheck { .. } => Handled,
            ActivityHsmEvent::Contact { now_ms } => {
                log::info!("waking up");
                self.state.sleeping = false;
                self.state.last_activity_ms = *now_ms;
                context.trigger = Some(TriggerKind::Wake);
                context.admission = Some(if self.suppress_wake_click {
                    self.state.trap_armed = true;
                    ContactAdmission::WokeAndSuppressed
                } else {
                    ContactAdmission::WokeAndAdmitted
                });
                Transition(State::awake())
            }
            ActivityHsmEvent::Release => Super,
        }
    }

    #[superstate]
    fn monitored(
        &mut self,
        context: &mut DispatchContext,
        event: &ActivityHsmEvent,
    ) -> Outcome<State> {
        let _ = context;
        match event {
            ActivityHsmEvent::Release => {
                self.state.trap_armed = false;
                Handled
            }
            _ => Handled,
        }
    }
}
