use tracing::trace;

use crate::{
    alphabet::{is_reserved, Expression},
    definition::{Definition, Successors},
    error::ValidationError,
};

/// Decides how a deterministic automaton treats (state, symbol) pairs without a successor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Completeness {
    /// Missing transitions are allowed, a run that needs one rejects immediately.
    #[default]
    Partial,
    /// Every state needs a successor for every symbol, otherwise validation fails with
    /// [`ValidationError::MissingTransition`].
    Total,
}

/// Checks that `definition` describes a well-formed automaton. The checks run in a fixed
/// order and the first violation is reported:
/// 1. there is at least one state and no reserved symbol is declared,
/// 2. the initial state is declared,
/// 3. every final state is declared,
/// 4. every transition starts in a declared state, uses a declared symbol (the empty
///    symbol only for non-deterministic automata) and leads to declared states,
/// 5. for [`Completeness::Total`] deterministic automata, every pair has a successor.
///
/// # Example
/// ```
/// use finite_automata::{prelude::*, validate::validate};
///
/// let mut definition = DfaDefinition::new("q0");
/// definition.final_states.insert(State::from("q1"));
/// assert_eq!(
///     validate(&definition, Completeness::Partial),
///     Err(ValidationError::FinalStateNotInStates { state: State::from("q1") })
/// );
/// ```
pub fn validate<T: Successors>(
    definition: &Definition<T>,
    completeness: Completeness,
) -> Result<(), ValidationError> {
    if definition.states.is_empty() {
        return Err(ValidationError::NoStates);
    }
    if let Some(&reserved) = definition.input_symbols.iter().find(|s| is_reserved(**s)) {
        return Err(ValidationError::InvalidSymbolInAlphabet {
            symbol: Expression::Symbol(reserved),
            state: None,
        });
    }
    if !definition.states.contains(&definition.initial_state) {
        return Err(ValidationError::InitialStateMissing {
            state: definition.initial_state.clone(),
        });
    }
    if let Some(q) = definition
        .final_states
        .iter()
        .find(|q| !definition.states.contains(q))
    {
        return Err(ValidationError::FinalStateNotInStates { state: q.clone() });
    }

    for (source, expression, successor) in definition.transition_triples() {
        if !definition.states.contains(source) {
            return Err(ValidationError::UnknownStateReferenced {
                state: source.clone(),
            });
        }
        let declared = match expression {
            Expression::Symbol(sym) => definition.input_symbols.contains(&sym),
            Expression::Epsilon => !T::DETERMINISTIC,
        };
        if !declared {
            return Err(ValidationError::InvalidSymbolInAlphabet {
                symbol: expression,
                state: Some(source.clone()),
            });
        }
        if let Some(target) = successor
            .targets()
            .find(|p| !definition.states.contains(*p))
        {
            return Err(ValidationError::UnknownStateReferenced {
                state: target.clone(),
            });
        }
    }

    if T::DETERMINISTIC && completeness == Completeness::Total {
        for q in &definition.states {
            let row = definition.transitions.get(q);
            for &symbol in &definition.input_symbols {
                if row.map_or(true, |r| !r.contains_key(&Expression::Symbol(symbol))) {
                    return Err(ValidationError::MissingTransition {
                        state: q.clone(),
                        symbol,
                    });
                }
            }
        }
    }

    trace!(
        "validated automaton with {} states and {} symbols",
        definition.states.len(),
        definition.input_symbols.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{prelude::*, validate::validate};
    use std::collections::BTreeMap;

    fn two_state_dfa() -> DfaDefinition {
        let mut def = DfaDefinition::new("q0");
        def.states.insert("q1".into());
        def.input_symbols.extend(['a', 'b']);
        def.transitions.insert(
            "q0".into(),
            BTreeMap::from([('a'.into(), "q1".into()), ('b'.into(), "q0".into())]),
        );
        def.transitions.insert(
            "q1".into(),
            BTreeMap::from([('a'.into(), "q1".into()), ('b'.into(), "q0".into())]),
        );
        def.final_states.insert("q1".into());
        def
    }

    #[test]
    fn accepts_consistent_definition() {
        let def = two_state_dfa();
        assert_eq!(validate(&def, Completeness::Total), Ok(()));
    }

    #[test]
    fn reports_structural_violations() {
        let mut def = two_state_dfa();
        def.initial_state = "q7".into();
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::InitialStateMissing {
                state: "q7".into()
            })
        );

        let mut def = two_state_dfa();
        def.transitions
            .get_mut(&State::from("q1"))
            .unwrap()
            .insert('a'.into(), "q9".into());
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::UnknownStateReferenced {
                state: "q9".into()
            })
        );

        let mut def = two_state_dfa();
        def.transitions.insert("q5".into(), BTreeMap::new());
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::UnknownStateReferenced {
                state: "q5".into()
            })
        );

        let mut def = two_state_dfa();
        def.states.clear();
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::NoStates)
        );
    }

    #[test]
    fn reports_symbol_violations() {
        let mut def = two_state_dfa();
        def.transitions
            .get_mut(&State::from("q0"))
            .unwrap()
            .insert(Expression::Epsilon, "q1".into());
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::InvalidSymbolInAlphabet {
                symbol: Expression::Epsilon,
                state: Some("q0".into())
            })
        );

        let mut def = two_state_dfa();
        def.transitions
            .get_mut(&State::from("q0"))
            .unwrap()
            .insert('c'.into(), "q1".into());
        assert!(matches!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::InvalidSymbolInAlphabet { .. })
        ));

        let mut def = two_state_dfa();
        def.input_symbols.insert('ε');
        assert_eq!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::InvalidSymbolInAlphabet {
                symbol: Expression::Symbol('ε'),
                state: None
            })
        );
    }

    #[test]
    fn totality_only_when_requested() {
        let mut def = two_state_dfa();
        def.transitions
            .get_mut(&State::from("q1"))
            .unwrap()
            .remove(&Expression::Symbol('b'));
        assert_eq!(validate(&def, Completeness::Partial), Ok(()));
        assert_eq!(
            validate(&def, Completeness::Total),
            Err(ValidationError::MissingTransition {
                state: "q1".into(),
                symbol: 'b'
            })
        );
    }

    #[test]
    fn epsilon_is_legal_for_nondeterministic() {
        let mut def = NfaDefinition::new("q0");
        def.states.insert("q1".into());
        def.transitions.insert(
            "q0".into(),
            BTreeMap::from([
                (Expression::Epsilon, StateSet::from(["q1".into()])),
                ('a'.into(), StateSet::new()),
            ]),
        );
        assert!(matches!(
            validate(&def, Completeness::Partial),
            Err(ValidationError::InvalidSymbolInAlphabet {
                symbol: Expression::Symbol('a'),
                ..
            })
        ));
        def.input_symbols.insert('a');
        assert_eq!(validate(&def, Completeness::Total), Ok(()));
    }
}
