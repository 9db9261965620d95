//! Round controller
//!
//! Owns the live [`MatchSession`] and drives it through
//! `AwaitingMoves → BothSubmitted → Settling → Resolved → Clearing | MatchComplete`.
//! Delays between phases are entries on a [`Timeline`]; the host reports
//! elapsed time through [`RoundController::advance`] and due transitions fire
//! in order. Reconfiguring cancels everything still pending, so no transition
//! ever lands on the session that replaced the one that scheduled it.

use crate::config::{MatchConfig, Mode, TargetPoints, Timings, DEFAULT_TARGET_POINTS};
use crate::error::SubmitError;
use crate::events::{GameEvent, Observer};
use crate::identity::{IdentityProvider, MatchSummary, UserProfile};
use crate::ledger::{Ledger, Score, SystemClock, WallClock};
use crate::moves::{Move, RoundOutcome, Slot};
use crate::random::{MoveSource, RandMoves};
use crate::resolve;
use crate::session::{MatchSession, Phase, Snapshot};
use crate::timeline::{Millis, Timeline};

/// Deferred work queued on the timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    /// CPU's hidden pick lands in slot two
    RevealCpu(Move),
    /// Both moves are captured when the round locks, so resolution can never
    /// run on a half-filled round
    Resolve { one: Move, two: Move },
    ClearRound,
    ResetMatch,
}

pub struct RoundController {
    timings: Timings,
    timeline: Timeline<Transition>,
    phase: Phase,
    session: Option<MatchSession>,
    /// Config and final score of the most recent completed match
    last_completed: Option<(MatchConfig, Score)>,
    ledger: Ledger,
    cpu: Box<dyn MoveSource>,
    clock: Box<dyn WallClock>,
    identity: Box<dyn IdentityProvider>,
    observers: Vec<Box<dyn Observer>>,
}

impl RoundController {
    /// Controller with an OS-seeded CPU, the system clock and nobody signed in
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            timeline: Timeline::new(),
            phase: Phase::AwaitingConfig,
            session: None,
            last_completed: None,
            ledger: Ledger::new(),
            cpu: Box::new(RandMoves::from_entropy()),
            clock: Box::new(SystemClock),
            identity: Box::new(None::<UserProfile>),
            observers: Vec::new(),
        }
    }

    /// Replace the CPU's move source
    pub fn with_move_source(mut self, source: impl MoveSource + 'static) -> Self {
        self.cpu = Box::new(source);
        self
    }

    /// Replace the clock used to timestamp history
    pub fn with_clock(mut self, clock: impl WallClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Start with `identity` signed in
    pub fn with_identity(mut self, identity: impl IdentityProvider + 'static) -> Self {
        self.identity = Box::new(identity);
        self
    }

    /// Swap who is signed in; takes effect for the next summary
    pub fn set_identity(&mut self, identity: impl IdentityProvider + 'static) {
        self.identity = Box::new(identity);
    }

    /// Deliver every future event to `observer`
    pub fn subscribe(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Start a new match. Whatever was in progress is discarded along with
    /// every transition it still had pending.
    pub fn configure_with(&mut self, config: MatchConfig) -> MatchConfig {
        let cancelled = self.timeline.cancel_all();
        if let Some(old) = self.session.take() {
            tracing::debug!(
                score = %old.score(),
                rounds = old.rounds_played(),
                cancelled,
                "discarding match in progress"
            );
        }

        self.session = Some(MatchSession::new(config));
        tracing::info!(mode = %config.mode, target = %config.target_points, "match configured");
        self.enter(Phase::AwaitingMoves);
        self.publish_state();
        config
    }

    /// Non-positive targets fall back to the default
    pub fn configure(&mut self, mode: Mode, target_points: i64) -> MatchConfig {
        self.configure_with(MatchConfig::new(mode, TargetPoints::coerce(target_points)))
    }

    /// Same as [`configure`](Self::configure) for raw form input
    pub fn configure_input(&mut self, mode: Mode, target_points: &str) -> MatchConfig {
        self.configure_with(MatchConfig::new(mode, TargetPoints::coerce_str(target_points)))
    }

    /// [`configure_input`](Self::configure_input) at host time `now`. Anything
    /// that came due before `now` fires first.
    pub fn configure_input_at(
        &mut self,
        mode: Mode,
        target_points: &str,
        now: Millis,
    ) -> MatchConfig {
        self.advance(now);
        self.configure_input(mode, target_points)
    }

    // ── Moves ────────────────────────────────────────────────────────

    /// Lock in `choice` for `slot`. On error nothing changed.
    pub fn submit_move(&mut self, slot: Slot, choice: Move) -> Result<(), SubmitError> {
        let result = self.try_submit(slot, choice);
        if let Err(err) = &result {
            tracing::debug!(%slot, %choice, %err, "submission ignored");
        }
        result
    }

    /// [`submit_move`](Self::submit_move) at host time `now`, so the CPU think
    /// and settle delays are measured from the click rather than from the
    /// last [`advance`](Self::advance).
    pub fn submit_move_at(
        &mut self,
        slot: Slot,
        choice: Move,
        now: Millis,
    ) -> Result<(), SubmitError> {
        self.advance(now);
        self.submit_move(slot, choice)
    }

    fn try_submit(&mut self, slot: Slot, choice: Move) -> Result<(), SubmitError> {
        let session = self.session.as_mut().ok_or(SubmitError::NoActiveMatch)?;
        if session.is_cpu_slot(slot) {
            return Err(SubmitError::ReservedSlot(slot));
        }
        if !session.fill(slot, choice) {
            return Err(SubmitError::DuplicateSubmission(slot));
        }
        let cpu_turn = session.config().mode == Mode::Cpu;
        let both = session.pending().both();

        self.emit(GameEvent::MoveSubmitted { slot, choice });

        if cpu_turn {
            let reply = self.cpu.next_move();
            if let Some(session) = self.session.as_mut() {
                session.set_cpu_thinking(true);
            }
            self.timeline.schedule(self.timings.cpu_think_ms, Transition::RevealCpu(reply));
            self.emit(GameEvent::CpuThinking);
        } else if let Some((one, two)) = both {
            self.lock_round(one, two);
        }

        self.publish_state();
        Ok(())
    }

    fn lock_round(&mut self, one: Move, two: Move) {
        self.enter(Phase::BothSubmitted);
        self.timeline.schedule(self.timings.settle_ms, Transition::Resolve { one, two });
        self.enter(Phase::Settling);
    }

    // ── Time ─────────────────────────────────────────────────────────

    /// Fire every transition due at or before `now`, including ones scheduled
    /// by earlier firings. Returns how many fired.
    pub fn advance(&mut self, now: Millis) -> usize {
        let mut fired = 0;
        while let Some((due, transition)) = self.timeline.pop_due(now) {
            tracing::debug!(due, ?transition, "transition fired");
            self.fire(transition);
            fired += 1;
        }
        self.timeline.advance_to(now);
        fired
    }

    /// [`advance`](Self::advance) by `elapsed` past the current time
    pub fn advance_by(&mut self, elapsed: Millis) -> usize {
        self.advance(self.timeline.now().saturating_add(elapsed))
    }

    fn fire(&mut self, transition: Transition) {
        match transition {
            Transition::RevealCpu(choice) => self.reveal_cpu(choice),
            Transition::Resolve { one, two } => self.resolve_round(one, two),
            Transition::ClearRound => self.clear_round(),
            Transition::ResetMatch => self.reset_match(),
        }
    }

    fn reveal_cpu(&mut self, choice: Move) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.set_cpu_thinking(false);
        session.fill(Slot::Two, choice);
        let both = session.pending().both();

        self.emit(GameEvent::CpuRevealed { choice });
        if let Some((one, two)) = both {
            self.lock_round(one, two);
        }
        self.publish_state();
    }

    fn resolve_round(&mut self, one: Move, two: Move) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        debug_assert_eq!(session.pending().both(), Some((one, two)));

        let outcome = resolve(one, two);
        session.apply(outcome);
        let score = session.score();
        let config = session.config();
        let complete = session.is_complete();

        self.enter(Phase::Resolved);
        self.emit(GameEvent::RoundResolved { one, two, outcome, score });
        self.emit(GameEvent::Announce { text: outcome.announcement().to_string() });

        if complete {
            self.complete_match(config, score);
        } else {
            self.enter(Phase::Clearing);
            self.timeline.schedule(self.timings.clear_ms, Transition::ClearRound);
        }
        self.publish_state();
    }

    fn complete_match(&mut self, config: MatchConfig, score: Score) {
        let entry = self.ledger.record(score, &config, self.clock.now()).clone();
        let winner = score.leader().unwrap_or(Slot::One);
        self.last_completed = Some((config, score));

        self.enter(Phase::MatchComplete);
        self.emit(GameEvent::MatchCompleted { winner, final_score: score });
        self.emit(GameEvent::HistoryAppended { entry });
        if let Some(summary) = self.summary() {
            self.emit(GameEvent::SummaryReady { summary });
        }
        self.timeline.schedule(self.timings.reset_ms, Transition::ResetMatch);
    }

    fn clear_round(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.clear_round();
        }
        self.enter(Phase::AwaitingMoves);
        self.publish_state();
    }

    fn reset_match(&mut self) {
        self.session = None;
        tracing::info!(matches = self.ledger.len(), "match reset, awaiting mode selection");
        self.enter(Phase::AwaitingConfig);
        self.emit(GameEvent::SessionReset);
        self.publish_state();
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&MatchSession> {
        self.session.as_ref()
    }

    pub fn config(&self) -> Option<MatchConfig> {
        self.session.as_ref().map(MatchSession::config)
    }

    /// Current match score; (0,0) when no match is running
    pub fn score(&self) -> Score {
        self.session.as_ref().map(MatchSession::score).unwrap_or_default()
    }

    pub fn pending_move(&self, slot: Slot) -> Option<Move> {
        self.session.as_ref().and_then(|s| s.pending().get(slot))
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.session.as_ref().and_then(MatchSession::last_outcome)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub fn now(&self) -> Millis {
        self.timeline.now()
    }

    /// Transitions still waiting to fire
    pub fn pending_transitions(&self) -> usize {
        self.timeline.pending()
    }

    /// Due time of the earliest pending transition
    pub fn next_due(&self) -> Option<Millis> {
        self.timeline.next_due()
    }

    /// Board state for rendering
    pub fn snapshot(&self) -> Snapshot {
        let session = self.session.as_ref();
        Snapshot {
            phase: self.phase,
            mode: session.map(|s| s.config().mode),
            target_points: session.map(|s| s.config().target_points.get()),
            pending: session.map(MatchSession::pending).unwrap_or_default(),
            cpu_thinking: session.is_some_and(MatchSession::cpu_thinking),
            last_outcome: session.and_then(MatchSession::last_outcome),
            score: self.score(),
            rounds_played: session.map_or(0, MatchSession::rounds_played),
            history: self.ledger.entries().to_vec(),
        }
    }

    /// Summary for export: the running match, else the last completed one.
    /// `None` when nobody is signed in.
    pub fn summary(&self) -> Option<MatchSummary> {
        let user = self.identity.current_user()?;
        let (target, score) = match (&self.session, &self.last_completed) {
            (Some(session), _) => (session.config().target_points.get(), session.score()),
            (None, Some((config, score))) => (config.target_points.get(), *score),
            (None, None) => (DEFAULT_TARGET_POINTS, Score::default()),
        };
        Some(MatchSummary::new(user, target, score))
    }

    // ── Notifications ────────────────────────────────────────────────

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.emit(GameEvent::PhaseChanged { phase });
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    fn publish_state(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        self.emit(GameEvent::StateChanged(snapshot));
    }
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new(Timings::standard())
    }
}
