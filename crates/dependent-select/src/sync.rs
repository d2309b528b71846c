//! Dependent Select Synchronizer
//!
//! Rebuilds the dependent control's options whenever the parent value changes.
//! Every sync takes a ticket; a response is applied only if its ticket is still
//! the latest one issued, so overlapping requests resolve as "last request wins".

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use tracing::{debug, error};

use crate::config::SentinelLabels;
use crate::controls::{DependentControl, ParentControl};
use crate::model::{SelectOption, StaffId, StaffRecord, SyncOutcome, SyncState};
use crate::source::StaffSource;

type StateObserver = Rc<dyn Fn(&SyncState)>;

pub struct DependentSelect<P, D, S> {
    parent: P,
    dependent: D,
    source: S,
    labels: SentinelLabels,
    issued: Cell<u64>,
    state: RefCell<SyncState>,
    observers: RefCell<Vec<StateObserver>>,
}

impl<P, D, S> DependentSelect<P, D, S>
where
    P: ParentControl,
    D: DependentControl,
    S: StaffSource,
{
    /// Creates an unbound synchronizer. Use [`DependentSelect::initialize`] to
    /// react to parent changes.
    pub fn new(parent: P, dependent: D, source: S, labels: SentinelLabels) -> Self {
        Self {
            parent,
            dependent,
            source,
            labels,
            issued: Cell::new(0),
            state: RefCell::new(SyncState::Empty),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Binds to the parent's change event and, when the parent already has a
    /// value (edit form), starts an initial sync that restores the dependent's
    /// current selection.
    ///
    /// `spawn` runs a sync on the UI task queue.
    pub fn initialize(
        parent: P,
        dependent: D,
        source: S,
        labels: SentinelLabels,
        spawn: impl Fn(LocalBoxFuture<'static, ()>) + 'static,
    ) -> Rc<Self>
    where
        P: 'static,
        D: 'static,
        S: 'static,
    {
        let this = Rc::new(Self::new(parent, dependent, source, labels));
        let spawn: Rc<dyn Fn(LocalBoxFuture<'static, ()>)> = Rc::new(spawn);

        let weak = Rc::downgrade(&this);
        let spawn_on_change = spawn.clone();
        this.parent.on_change(Box::new(move || {
            let Some(this) = weak.upgrade() else { return };
            // Read at event time; an emptied course settles without waiting for a task
            let course_id = this.parent.value();
            if course_id.is_empty() {
                this.clear();
                return;
            }
            spawn_on_change(
                async move {
                    this.sync(&course_id, None).await;
                }
                .boxed_local(),
            );
        }));

        let course_id = this.parent.value();
        if !course_id.is_empty() {
            let preferred = this.dependent.current_selection().map(StaffId::from);
            debug!(course_id = %course_id, preferred = ?preferred, "initial staff sync");
            let initial = this.clone();
            spawn(
                async move {
                    initial.sync(&course_id, preferred).await;
                }
                .boxed_local(),
            );
        }

        this
    }

    /// Change handler: a fresh parent selection never keeps the old staff value
    pub async fn on_parent_changed(&self) -> SyncOutcome {
        let course_id = self.parent.value();
        self.sync(&course_id, None).await
    }

    /// Rebuilds the dependent options for `course_id`.
    ///
    /// Never fails: an unreachable source shows the error sentinel and is
    /// logged. Returns `Superseded` when a newer sync was issued meanwhile.
    pub async fn sync(&self, course_id: &str, preferred: Option<StaffId>) -> SyncOutcome {
        if course_id.is_empty() {
            return self.clear();
        }
        let ticket = self.issue_ticket();

        self.transition(SyncState::Loading {
            course_id: course_id.to_string(),
        });
        let result = self.source.staff_for_course(course_id).await;

        let latest = self.issued.get();
        if ticket != latest {
            debug!(course_id, ticket, latest, "discarding superseded staff response");
            return SyncOutcome::Superseded;
        }

        let state = match result {
            Ok(records) if records.is_empty() => {
                self.show_sentinel(&self.labels.no_staff);
                SyncState::Populated {
                    course_id: course_id.to_string(),
                    staff_count: 0,
                    selected: None,
                }
            }
            Ok(records) => {
                let options: Vec<SelectOption> = records.iter().map(SelectOption::from).collect();
                self.dependent.replace_options(&options);

                let selected = preferred
                    .filter(|p| !p.as_str().is_empty())
                    .and_then(|p| find_preferred(&records, &p));
                if let Some(value) = &selected {
                    self.dependent.select(value);
                }
                debug!(course_id, staff = records.len(), selected = ?selected, "staff options loaded");

                SyncState::Populated {
                    course_id: course_id.to_string(),
                    staff_count: records.len(),
                    selected,
                }
            }
            Err(err) => {
                error!(course_id, error = %err, "error fetching staff");
                self.show_sentinel(&self.labels.load_error);
                SyncState::Failed {
                    course_id: course_id.to_string(),
                    reason: err.to_string(),
                }
            }
        };

        self.settle(state)
    }

    /// Shows the "no selection" sentinel and drops any request in flight
    pub fn clear(&self) -> SyncOutcome {
        self.issue_ticket();
        self.show_sentinel(&self.labels.no_selection);
        self.settle(SyncState::Empty)
    }

    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Registers a callback invoked on every state transition
    pub fn on_state_change(&self, observer: impl Fn(&SyncState) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    fn issue_ticket(&self) -> u64 {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        ticket
    }

    fn show_sentinel(&self, label: &str) {
        self.dependent.replace_options(&[SelectOption::sentinel(label)]);
    }

    fn settle(&self, state: SyncState) -> SyncOutcome {
        self.transition(state.clone());
        SyncOutcome::Applied(state)
    }

    fn transition(&self, state: SyncState) {
        *self.state.borrow_mut() = state.clone();
        // Observers may register further observers
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer(&state);
        }
    }
}

/// Option value of the record matching `preferred`, if any
fn find_preferred(records: &[StaffRecord], preferred: &StaffId) -> Option<String> {
    records
        .iter()
        .find(|r| r.id.matches(preferred))
        .map(|r| r.id.to_string())
}
