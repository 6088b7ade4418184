//! The state machine engine.

use crate::builder::TransitionSource;
use crate::core::{CommandId, Guard, StateId, Subject, TransitionHistory, TransitionRecord};
use crate::engine::error::{BoxError, ExecuteError};
use crate::engine::table::TransitionTable;
use chrono::Utc;
use std::collections::HashMap;

/// A fallible side effect bound to a command.
///
/// Actions take no arguments: any data they need must be captured in the
/// closure at registration time.
pub type Action = Box<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// Engine that executes commands against an external subject.
///
/// The machine owns its configuration - the transition table and the
/// command-to-action bindings - plus the subject it governs and a history
/// of committed transitions. It holds no other state: the subject is read
/// at the start of every [`execute`](StateMachine::execute) and written
/// exactly once on success.
///
/// Setup (`register_command`, `add_transition`, the fluent builder) and
/// execution are expected to be non-overlapping phases; the engine does no
/// internal locking.
pub struct StateMachine<S: StateId, C: CommandId, M: Subject<S>> {
    subject: M,
    actions: HashMap<C, Action>,
    table: TransitionTable<S, C>,
    history: TransitionHistory<S, C>,
}

impl<S: StateId, C: CommandId, M: Subject<S>> StateMachine<S, C, M> {
    /// Create an engine governing the given subject.
    pub fn new(subject: M) -> Self {
        Self {
            subject,
            actions: HashMap::new(),
            table: TransitionTable::new(),
            history: TransitionHistory::new(),
        }
    }

    /// Bind an action to a command identifier.
    ///
    /// Registration is idempotent with first-writer-wins semantics:
    /// binding a command that already has an action is a no-op.
    pub fn register_command<F>(&mut self, command: C, action: F) -> &mut Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.actions
            .entry(command)
            .or_insert_with(|| Box::new(action));
        self
    }

    /// Register a candidate target for a (from-state, command) pair.
    ///
    /// Re-registering an existing to-state under the same pair is a no-op
    /// that never overwrites an existing guard. Distinct to-states model
    /// branching transitions and are kept in insertion order.
    pub fn add_transition(&mut self, from: S, command: C, to: S, guard: Option<Guard>) -> &mut Self {
        self.table.insert(from, command, to, guard);
        self
    }

    /// Start a fluent transition declaration from the given state.
    ///
    /// See [`TransitionSource`] for the chain; each `.add()` commits
    /// synchronously to the table.
    pub fn from(&mut self, state: S) -> TransitionSource<'_, S, C, M> {
        TransitionSource::new(self, state)
    }

    /// Execute a command against the subject's current state.
    ///
    /// The sequence is fixed: the action is looked up first, then the
    /// transition set for the current state, then the first admissible
    /// target in insertion order. Only once a target is selected does the
    /// action run; on action failure the transition is never applied. Any
    /// failure leaves the subject exactly as it was before the call.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::UnknownCommand`] if no action is bound
    /// - [`ExecuteError::NoTransitionForState`] if the pair has no entry
    /// - [`ExecuteError::NoAdmissibleTransition`] if every guard rejected
    /// - [`ExecuteError::ActionFailed`] wrapping the action's own error
    pub fn execute(&mut self, command: C) -> Result<(), ExecuteError> {
        let current = self.subject.state();

        let action = self
            .actions
            .get(&command)
            .ok_or_else(|| ExecuteError::UnknownCommand {
                command: format!("{command:?}"),
            })?;

        let targets = self.table.targets(&current, &command).ok_or_else(|| {
            ExecuteError::NoTransitionForState {
                command: format!("{command:?}"),
                state: format!("{current:?}"),
            }
        })?;

        let mut selected = None;
        for target in targets {
            match target.guard() {
                None => {
                    selected = Some(target);
                    break;
                }
                Some(guard) if guard.check() => {
                    selected = Some(target);
                    break;
                }
                Some(_) => {
                    tracing::trace!(command = ?command, to = ?target.to(), "guard rejected target");
                }
            }
        }

        let to = match selected {
            Some(target) => target.to().clone(),
            None => {
                return Err(ExecuteError::NoAdmissibleTransition {
                    command: format!("{command:?}"),
                    state: format!("{current:?}"),
                })
            }
        };

        (action)().map_err(|source| ExecuteError::ActionFailed {
            command: format!("{command:?}"),
            source,
        })?;

        tracing::debug!(command = ?command, from = ?current, to = ?to, "transition committed");

        self.subject.set_state(to.clone());
        self.history = self.history.record(TransitionRecord {
            from: current,
            to,
            command,
            timestamp: Utc::now(),
        });

        Ok(())
    }

    /// The subject's current state.
    pub fn current_state(&self) -> S {
        self.subject.state()
    }

    /// Borrow the governed subject.
    pub fn subject(&self) -> &M {
        &self.subject
    }

    /// Mutably borrow the governed subject.
    pub fn subject_mut(&mut self) -> &mut M {
        &mut self.subject
    }

    /// Give the subject back, consuming the engine.
    pub fn into_subject(self) -> M {
        self.subject
    }

    /// History of committed transitions.
    pub fn history(&self) -> &TransitionHistory<S, C> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum GateState {
        Locked,
        Unlocked,
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    enum GateCommand {
        InsertCoin,
        PushButton,
    }

    struct Turnstile {
        state: GateState,
    }

    impl Subject<GateState> for Turnstile {
        fn state(&self) -> GateState {
            self.state.clone()
        }

        fn set_state(&mut self, state: GateState) {
            self.state = state;
        }
    }

    fn turnstile_machine() -> StateMachine<GateState, GateCommand, Turnstile> {
        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        machine
            .register_command(GateCommand::InsertCoin, || Ok(()))
            .register_command(GateCommand::PushButton, || Ok(()));
        machine
            .add_transition(
                GateState::Locked,
                GateCommand::InsertCoin,
                GateState::Unlocked,
                None,
            )
            .add_transition(
                GateState::Unlocked,
                GateCommand::PushButton,
                GateState::Locked,
                None,
            );
        machine
    }

    #[test]
    fn turnstile_round_trip() {
        let mut machine = turnstile_machine();

        machine.execute(GateCommand::InsertCoin).unwrap();
        assert_eq!(machine.current_state(), GateState::Unlocked);

        machine.execute(GateCommand::PushButton).unwrap();
        assert_eq!(machine.current_state(), GateState::Locked);

        let err = machine.execute(GateCommand::PushButton).unwrap_err();
        assert!(matches!(err, ExecuteError::NoTransitionForState { .. }));
        assert_eq!(machine.current_state(), GateState::Locked);
    }

    #[test]
    fn unknown_command_fails_without_side_effect() {
        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        enum Extra {
            Kick,
        }

        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        machine.add_transition(GateState::Locked, Extra::Kick, GateState::Unlocked, None);

        let err = machine.execute(Extra::Kick).unwrap_err();
        assert!(matches!(err, ExecuteError::UnknownCommand { .. }));
        assert_eq!(machine.current_state(), GateState::Locked);
    }

    #[test]
    fn action_does_not_run_for_inapplicable_state() {
        let invocations = Arc::new(AtomicUsize::new(0));

        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        let counter = Arc::clone(&invocations);
        machine.register_command(GateCommand::PushButton, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        machine.add_transition(
            GateState::Unlocked,
            GateCommand::PushButton,
            GateState::Locked,
            None,
        );

        let err = machine.execute(GateCommand::PushButton).unwrap_err();
        assert!(matches!(err, ExecuteError::NoTransitionForState { .. }));
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejected_guards_leave_subject_and_action_untouched() {
        let invocations = Arc::new(AtomicUsize::new(0));

        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        let counter = Arc::clone(&invocations);
        machine.register_command(GateCommand::InsertCoin, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        machine.add_transition(
            GateState::Locked,
            GateCommand::InsertCoin,
            GateState::Unlocked,
            Some(Guard::new(|| false)),
        );

        let err = machine.execute(GateCommand::InsertCoin).unwrap_err();
        assert!(matches!(err, ExecuteError::NoAdmissibleTransition { .. }));
        assert_eq!(machine.current_state(), GateState::Locked);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn action_failure_blocks_the_transition() {
        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        machine.register_command(GateCommand::InsertCoin, || Err("coin jammed".into()));
        machine.add_transition(
            GateState::Locked,
            GateCommand::InsertCoin,
            GateState::Unlocked,
            None,
        );

        let err = machine.execute(GateCommand::InsertCoin).unwrap_err();
        assert!(matches!(err, ExecuteError::ActionFailed { .. }));
        assert_eq!(machine.current_state(), GateState::Locked);
        assert!(machine.history().records().is_empty());
    }

    #[test]
    fn command_registration_is_first_writer_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let mut machine = StateMachine::new(Turnstile {
            state: GateState::Locked,
        });
        let winning = Arc::clone(&first);
        machine.register_command(GateCommand::InsertCoin, move || {
            winning.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let losing = Arc::clone(&second);
        machine.register_command(GateCommand::InsertCoin, move || {
            losing.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        machine.add_transition(
            GateState::Locked,
            GateCommand::InsertCoin,
            GateState::Unlocked,
            None,
        );

        machine.execute(GateCommand::InsertCoin).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        assert_eq!(machine.current_state(), GateState::Unlocked);
    }

    #[test]
    fn unconditional_target_registered_first_always_wins() {
        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        enum S {
            Start,
            First,
            Second,
        }
        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        enum Cmd {
            Go,
        }
        struct Cell {
            state: S,
        }
        impl Subject<S> for Cell {
            fn state(&self) -> S {
                self.state.clone()
            }
            fn set_state(&mut self, state: S) {
                self.state = state;
            }
        }

        let mut machine = StateMachine::new(Cell { state: S::Start });
        machine.register_command(Cmd::Go, || Ok(()));
        machine
            .add_transition(S::Start, Cmd::Go, S::First, None)
            .add_transition(S::Start, Cmd::Go, S::Second, Some(Guard::new(|| true)));

        machine.execute(Cmd::Go).unwrap();
        assert_eq!(machine.current_state(), S::First);
    }

    #[test]
    fn successful_execution_appends_history() {
        let mut machine = turnstile_machine();

        machine.execute(GateCommand::InsertCoin).unwrap();
        machine.execute(GateCommand::PushButton).unwrap();

        let records = machine.history().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].from, GateState::Locked);
        assert_eq!(records[0].to, GateState::Unlocked);
        assert_eq!(records[0].command, GateCommand::InsertCoin);
        assert_eq!(records[1].to, GateState::Locked);

        let path = machine.history().path();
        assert_eq!(
            path,
            vec![&GateState::Locked, &GateState::Unlocked, &GateState::Locked]
        );
    }

    // Invoice approval: the guarded-branch scenario. Approval routes to
    // signature collection while a signature is outstanding, otherwise
    // straight to payment.
    mod invoice {
        use super::*;

        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        enum InvoiceState {
            WaitingForApproval,
            WaitingForSignature,
            WaitingForPayment,
            Completed,
        }

        #[derive(Clone, PartialEq, Eq, Hash, Debug)]
        enum InvoiceCommand {
            Approve,
            ReceiveSignature,
            Pay,
        }

        struct Invoice {
            state: InvoiceState,
            needs_signature: bool,
            signature_received: bool,
            approved: bool,
        }

        #[derive(Clone)]
        struct InvoiceHandle(Arc<Mutex<Invoice>>);

        impl InvoiceHandle {
            fn new(needs_signature: bool) -> Self {
                Self(Arc::new(Mutex::new(Invoice {
                    state: InvoiceState::WaitingForApproval,
                    needs_signature,
                    signature_received: false,
                    approved: false,
                })))
            }
        }

        impl Subject<InvoiceState> for InvoiceHandle {
            fn state(&self) -> InvoiceState {
                self.0.lock().unwrap().state.clone()
            }

            fn set_state(&mut self, state: InvoiceState) {
                self.0.lock().unwrap().state = state;
            }
        }

        fn invoice_machine(
            handle: InvoiceHandle,
        ) -> StateMachine<InvoiceState, InvoiceCommand, InvoiceHandle> {
            let mut machine = StateMachine::new(handle.clone());

            let approving = handle.clone();
            machine.register_command(InvoiceCommand::Approve, move || {
                approving.0.lock().unwrap().approved = true;
                Ok(())
            });
            let signing = handle.clone();
            machine.register_command(InvoiceCommand::ReceiveSignature, move || {
                signing.0.lock().unwrap().signature_received = true;
                Ok(())
            });
            machine.register_command(InvoiceCommand::Pay, || Ok(()));

            let guarding = handle.clone();
            machine
                .from(InvoiceState::WaitingForApproval)
                .on(InvoiceCommand::Approve)
                .to(InvoiceState::WaitingForSignature)
                .when(move || {
                    let invoice = guarding.0.lock().unwrap();
                    invoice.needs_signature && !invoice.signature_received
                })
                .add()
                .on(InvoiceCommand::Approve)
                .to(InvoiceState::WaitingForPayment)
                .add();

            machine
                .from(InvoiceState::WaitingForSignature)
                .on(InvoiceCommand::ReceiveSignature)
                .to(InvoiceState::WaitingForPayment)
                .add();

            machine
                .from(InvoiceState::WaitingForPayment)
                .on(InvoiceCommand::Pay)
                .to(InvoiceState::Completed)
                .add();

            machine
        }

        #[test]
        fn approval_routes_to_signature_when_guard_holds() {
            let handle = InvoiceHandle::new(true);
            let mut machine = invoice_machine(handle.clone());

            machine.execute(InvoiceCommand::Approve).unwrap();

            assert_eq!(machine.current_state(), InvoiceState::WaitingForSignature);
            assert!(handle.0.lock().unwrap().approved);

            machine.execute(InvoiceCommand::ReceiveSignature).unwrap();
            assert_eq!(machine.current_state(), InvoiceState::WaitingForPayment);

            machine.execute(InvoiceCommand::Pay).unwrap();
            assert_eq!(machine.current_state(), InvoiceState::Completed);
        }

        #[test]
        fn approval_skips_signature_when_guard_rejects() {
            let handle = InvoiceHandle::new(false);
            let mut machine = invoice_machine(handle);

            machine.execute(InvoiceCommand::Approve).unwrap();

            assert_eq!(machine.current_state(), InvoiceState::WaitingForPayment);
        }

        #[test]
        fn failing_payment_keeps_invoice_waiting() {
            let handle = InvoiceHandle::new(false);
            let mut machine = StateMachine::new(handle.clone());

            machine.register_command(InvoiceCommand::Approve, || Ok(()));
            machine.register_command(InvoiceCommand::Pay, || Err("insufficient funds".into()));
            machine
                .add_transition(
                    InvoiceState::WaitingForApproval,
                    InvoiceCommand::Approve,
                    InvoiceState::WaitingForPayment,
                    None,
                )
                .add_transition(
                    InvoiceState::WaitingForPayment,
                    InvoiceCommand::Pay,
                    InvoiceState::Completed,
                    None,
                );

            machine.execute(InvoiceCommand::Approve).unwrap();

            let err = machine.execute(InvoiceCommand::Pay).unwrap_err();
            assert!(matches!(err, ExecuteError::ActionFailed { .. }));
            assert_eq!(machine.current_state(), InvoiceState::WaitingForPayment);
        }
    }
}
