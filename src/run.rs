use std::fmt::Display;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    alphabet::Symbol,
    automaton::{Dfa, Nfa},
    error::InvalidSymbolError,
    state::{State, StateSet},
    word::Word,
    Show,
};

/// The outcome of a run. A rejected word is a regular result and not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The word is accepted.
    Accepted,
    /// The word is rejected.
    Rejected,
}

impl Verdict {
    /// Returns true for [`Verdict::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

impl From<bool> for Verdict {
    fn from(value: bool) -> Self {
        if value {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl Show for Verdict {
    fn show(&self) -> String {
        match self {
            Verdict::Accepted => "accepted",
            Verdict::Rejected => "rejected",
        }
        .to_string()
    }
}

/// What a run is in at some point: a single state for deterministic automata and the set
/// of active states for non-deterministic ones.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Configuration {
    /// The current state of a deterministic run.
    State(State),
    /// The active states of a non-deterministic run.
    States(StateSet),
}

impl Show for Configuration {
    fn show(&self) -> String {
        match self {
            Configuration::State(q) => q.show(),
            Configuration::States(states) => states.show(),
        }
    }
}

/// A single step of a run: reading `symbol` moved the run from `from` to `to`. The index is
/// the 1-based position of the symbol in the word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Step<Q> {
    index: usize,
    from: Q,
    symbol: Symbol,
    to: Q,
}

impl<Q> Step<Q> {
    /// Creates a new step.
    pub fn new(index: usize, from: Q, symbol: Symbol, to: Q) -> Self {
        Self {
            index,
            from,
            symbol,
            to,
        }
    }

    /// The 1-based position of the consumed symbol in the word.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Where the step starts.
    pub fn from(&self) -> &Q {
        &self.from
    }

    /// The consumed symbol.
    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Where the step ends.
    pub fn to(&self) -> &Q {
        &self.to
    }

    /// Applies `f` to both ends of the step.
    pub fn map<R, F: FnMut(Q) -> R>(self, mut f: F) -> Step<R> {
        Step {
            index: self.index,
            from: f(self.from),
            symbol: self.symbol,
            to: f(self.to),
        }
    }
}

impl<Q: Show> Show for Step<Q> {
    fn show(&self) -> String {
        format!(
            "({}, {}, {})",
            self.from.show(),
            self.symbol,
            self.to.show()
        )
    }
}

/// The record of a run: the steps in the order in which they were taken and the verdict.
///
/// A deterministic run that hits a missing transition stops without a step for that symbol.
/// A non-deterministic run records the step into the empty set of states and stops there.
/// In both cases [`Trace::halted_at`] gives the 1-based position of the symbol at which the
/// run gave up, and the verdict is [`Verdict::Rejected`].
///
/// # Example
/// ```
/// use finite_automata::prelude::*;
///
/// let dfa = Dfa::builder()
///     .with_transitions([("q0", 'a', "q1"), ("q1", 'b', "q0")])
///     .with_final_states(["q0"])
///     .into_dfa("q0")
///     .unwrap();
/// let trace = dfa.simulate("abb").unwrap();
/// assert_eq!(trace.verdict(), Verdict::Rejected);
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.halted_at(), Some(3));
/// assert_eq!(trace.show(), "(q0, a, q1) (q1, b, q0) rejected");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Trace<Q> {
    steps: Vec<Step<Q>>,
    verdict: Verdict,
    halted_at: Option<usize>,
}

impl<Q> Trace<Q> {
    fn completed(steps: Vec<Step<Q>>, verdict: Verdict) -> Self {
        Self {
            steps,
            verdict,
            halted_at: None,
        }
    }

    fn halted(steps: Vec<Step<Q>>, position: usize) -> Self {
        Self {
            steps,
            verdict: Verdict::Rejected,
            halted_at: Some(position),
        }
    }

    /// The steps in the order in which they were taken.
    pub fn steps(&self) -> &[Step<Q>] {
        &self.steps
    }

    /// Iterates over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, Step<Q>> {
        self.steps.iter()
    }

    /// Consumes `self` and returns the steps.
    pub fn into_steps(self) -> Vec<Step<Q>> {
        self.steps
    }

    /// The verdict of the run.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns true if the run accepted.
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_accepted()
    }

    /// The number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no step was taken.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&Step<Q>> {
        self.steps.last()
    }

    /// If the run stopped before the word was read completely, gives the 1-based position
    /// of the symbol at which it stopped.
    pub fn halted_at(&self) -> Option<usize> {
        self.halted_at
    }

    /// Applies `f` to every state (or state set) in the trace.
    pub fn map<R, F: FnMut(Q) -> R>(self, mut f: F) -> Trace<R> {
        Trace {
            steps: self
                .steps
                .into_iter()
                .map(|step| step.map(&mut f))
                .collect(),
            verdict: self.verdict,
            halted_at: self.halted_at,
        }
    }
}

impl<'a, Q> IntoIterator for &'a Trace<Q> {
    type Item = &'a Step<Q>;
    type IntoIter = std::slice::Iter<'a, Step<Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl<Q: Show> Show for Trace<Q> {
    fn show(&self) -> String {
        self.steps
            .iter()
            .map(|step| step.show())
            .chain(std::iter::once(self.verdict.show()))
            .join(" ")
    }
}

impl<Q: Show> Display for Trace<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}

impl Dfa {
    /// Runs `word` from the initial state and records every step.
    ///
    /// Fails with an [`InvalidSymbolError`] before taking any step if `word` contains a
    /// symbol outside the alphabet. If some state has no transition for the symbol that is
    /// read next, the run is rejected right there.
    pub fn simulate<W: Word + ?Sized>(&self, word: &W) -> Result<Trace<State>, InvalidSymbolError> {
        let symbols = word.symbols();
        let positions = self.alphabet().positions_of(&symbols)?;

        let mut steps = Vec::with_capacity(symbols.len());
        let mut current = self.initial_index();
        for (index, (&symbol, position)) in (1..).zip(symbols.iter().zip(positions)) {
            let Some(next) = self.successor_index(current, position) else {
                debug!(
                    "rejecting, state {} has no transition on {symbol}",
                    self.label(current).show()
                );
                return Ok(Trace::halted(steps, index));
            };
            trace!(
                "{} --{symbol}--> {}",
                self.label(current).show(),
                self.label(next).show()
            );
            steps.push(Step::new(
                index,
                self.label(current).clone(),
                symbol,
                self.label(next).clone(),
            ));
            current = next;
        }

        let verdict = Verdict::from(self.is_accepting_index(current));
        debug!("run of length {} ends in {}", steps.len(), verdict.show());
        Ok(Trace::completed(steps, verdict))
    }

    /// Decides whether `word` is accepted without recording a trace.
    pub fn accepts<W: Word + ?Sized>(&self, word: &W) -> Result<bool, InvalidSymbolError> {
        let positions = self.alphabet().positions_of(&word.symbols())?;
        let mut current = self.initial_index();
        for position in positions {
            match self.successor_index(current, position) {
                Some(next) => current = next,
                None => return Ok(false),
            }
        }
        Ok(self.is_accepting_index(current))
    }
}

impl Nfa {
    /// Runs `word` and records for every symbol the set of active states before and after
    /// reading it. The run starts in the empty-symbol closure of the initial state, and
    /// after each symbol the closure of all successors becomes active.
    ///
    /// Fails with an [`InvalidSymbolError`] before taking any step if `word` contains a
    /// symbol outside the alphabet. If no state is active anymore, the step into the empty
    /// set is recorded and the run is rejected.
    pub fn simulate<W: Word + ?Sized>(
        &self,
        word: &W,
    ) -> Result<Trace<StateSet>, InvalidSymbolError> {
        let symbols = word.symbols();
        let positions = self.alphabet().positions_of(&symbols)?;

        let mut steps = Vec::with_capacity(symbols.len());
        let mut current = self.closure_of_index(self.initial_index());
        for (index, (&symbol, position)) in (1..).zip(symbols.iter().zip(positions)) {
            let next = self.advance(&current, position);
            let step = Step::new(index, self.labels(&current), symbol, self.labels(&next));
            trace!("{}", step.show());
            steps.push(step);
            if next.is_empty() {
                debug!("rejecting, no state is active after symbol {index}");
                return Ok(Trace::halted(steps, index));
            }
            current = next;
        }

        let verdict = Verdict::from(!current.is_disjoint(self.accepting()));
        debug!("run of length {} ends in {}", steps.len(), verdict.show());
        Ok(Trace::completed(steps, verdict))
    }

    /// Decides whether `word` is accepted without recording a trace.
    pub fn accepts<W: Word + ?Sized>(&self, word: &W) -> Result<bool, InvalidSymbolError> {
        let current = self.final_configuration(word)?;
        Ok(!current.is_disjoint(self.accepting()))
    }

    /// Reads `word` and returns the set of states that are active afterwards. The set is
    /// empty if the run died on the way.
    pub fn read_input<W: Word + ?Sized>(&self, word: &W) -> Result<StateSet, InvalidSymbolError> {
        Ok(self.labels(&self.final_configuration(word)?))
    }

    /// Reads `word` and returns the active states before the first symbol and after every
    /// symbol. The sequence ends early with the empty set if the run dies.
    pub fn read_input_stepwise<W: Word + ?Sized>(
        &self,
        word: &W,
    ) -> Result<Vec<StateSet>, InvalidSymbolError> {
        let positions = self.alphabet().positions_of(&word.symbols())?;
        let mut current = self.closure_of_index(self.initial_index());
        let mut configurations = vec![self.labels(&current)];
        for position in positions {
            if current.is_empty() {
                break;
            }
            current = self.advance(&current, position);
            configurations.push(self.labels(&current));
        }
        Ok(configurations)
    }

    fn final_configuration<W: Word + ?Sized>(
        &self,
        word: &W,
    ) -> Result<crate::math::IndexSet, InvalidSymbolError> {
        let positions = self.alphabet().positions_of(&word.symbols())?;
        let mut current = self.closure_of_index(self.initial_index());
        for position in positions {
            if current.is_empty() {
                break;
            }
            current = self.advance(&current, position);
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn set<const N: usize>(labels: [&str; N]) -> StateSet {
        labels.into_iter().map(State::from).collect()
    }

    /// Accepts words over {0,1} that contain `11` or end in `10`, with an empty-symbol
    /// shortcut from q1 to q2.
    fn sample_nfa() -> Nfa {
        Nfa::builder()
            .with_alphabet_symbols(['0', '1'])
            .with_transitions([
                ("q0", Expression::from('0'), "q0"),
                ("q0", Expression::from('1'), "q0"),
                ("q0", Expression::from('1'), "q1"),
                ("q1", Expression::from('0'), "q2"),
                ("q1", Expression::Epsilon, "q2"),
                ("q2", Expression::from('1'), "q3"),
            ])
            .with_final_states(["q2", "q3"])
            .into_nfa("q0")
            .unwrap()
    }

    #[test_log::test]
    fn deterministic_trace_lists_states() {
        let dfa = crate::tests::ends_in_double_dfa();
        let trace = dfa.simulate("10011").unwrap();
        assert_eq!(
            trace.show(),
            "(q0, 1, q1) (q1, 0, q3) (q3, 0, q4) (q4, 1, q1) (q1, 1, q2) accepted"
        );
        assert_eq!(trace.halted_at(), None);
        assert_eq!(
            trace.iter().map(|step| step.index()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(trace.steps()[2].from(), &State::from("q3"));
        assert_eq!(trace.steps()[2].symbol(), '0');
    }

    #[test]
    fn deterministic_missing_transition_rejects() {
        let dfa = Dfa::builder()
            .with_alphabet_symbols(['a', 'b'])
            .with_transitions([("q0", 'a', "q1"), ("q1", 'a', "q1")])
            .with_final_states(["q1"])
            .into_dfa("q0")
            .unwrap();
        let trace = dfa.simulate("aba").unwrap();
        assert_eq!(trace.verdict(), Verdict::Rejected);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.halted_at(), Some(2));
        assert_eq!(dfa.accepts("aba"), Ok(false));
        assert_eq!(dfa.accepts("aa"), Ok(true));
    }

    #[test]
    fn invalid_symbols_fail_before_any_step() {
        let dfa = crate::tests::ends_in_double_dfa();
        assert_eq!(
            dfa.simulate("0120"),
            Err(InvalidSymbolError {
                symbol: '2',
                position: 3
            })
        );
        assert!(dfa.accepts(&['0', 'x'][..]).is_err());
        let nfa = sample_nfa();
        assert!(nfa.simulate("a").is_err());
        assert!(nfa.read_input_stepwise("01a").is_err());
    }

    #[test_log::test]
    fn nondeterministic_trace_lists_sets() {
        let nfa = sample_nfa();
        let trace = nfa.simulate("1010").unwrap();
        assert_eq!(trace.verdict(), Verdict::Accepted);
        assert_eq!(trace.len(), 4);
        assert_eq!(
            trace.iter().map(|step| step.index()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        let expected = [
            (set(["q0"]), '1', set(["q0", "q1", "q2"])),
            (set(["q0", "q1", "q2"]), '0', set(["q0", "q2"])),
            (set(["q0", "q2"]), '1', set(["q0", "q1", "q2", "q3"])),
            (set(["q0", "q1", "q2", "q3"]), '0', set(["q0", "q2"])),
        ];
        for (step, (from, symbol, to)) in trace.iter().zip(expected) {
            assert_eq!(step.from(), &from);
            assert_eq!(step.symbol(), symbol);
            assert_eq!(step.to(), &to);
        }
    }

    #[test]
    fn nondeterministic_run_records_step_into_empty_set() {
        let nfa = Nfa::builder()
            .with_transitions([
                ("q0", Expression::from('1'), "q1"),
                ("q1", Expression::from('0'), "q2"),
            ])
            .with_final_states(["q2"])
            .into_nfa("q0")
            .unwrap();
        let trace = nfa.simulate("101").unwrap();
        assert_eq!(trace.verdict(), Verdict::Rejected);
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.last().unwrap().to(), &StateSet::new());
        assert_eq!(trace.halted_at(), Some(3));
        assert_eq!(trace.last().unwrap().index(), 3);
        assert_eq!(trace.last().unwrap().show(), "({q2}, 1, ∅)");

        let died = nfa.simulate("11").unwrap();
        assert_eq!(died.len(), 2);
        assert_eq!(died.halted_at(), Some(2));
        assert_eq!(nfa.read_input("11"), Ok(StateSet::new()));
        assert_eq!(
            nfa.read_input_stepwise("110").unwrap(),
            vec![set(["q0"]), set(["q1"]), StateSet::new()]
        );
    }

    #[test]
    fn read_input_reports_active_states() {
        let nfa = sample_nfa();
        assert_eq!(nfa.read_input(""), Ok(set(["q0"])));
        assert_eq!(nfa.read_input("11"), Ok(set(["q0", "q1", "q2", "q3"])));
        assert_eq!(
            nfa.read_input_stepwise("10").unwrap(),
            vec![set(["q0"]), set(["q0", "q1", "q2"]), set(["q0", "q2"])]
        );
        assert_eq!(nfa.accepts("00"), Ok(false));
        assert_eq!(nfa.accepts("1"), Ok(true));
    }

    #[test]
    fn map_converts_configurations() {
        let dfa = crate::tests::ends_in_double_dfa();
        let trace = dfa.simulate("00").unwrap().map(Configuration::State);
        assert!(trace.is_accepted());
        assert_eq!(
            trace.last().unwrap().to(),
            &Configuration::State("q4".into())
        );
        assert_eq!(trace.to_string(), "(q0, 0, q3) (q3, 0, q4) accepted");
    }
}
