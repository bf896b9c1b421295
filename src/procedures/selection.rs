/*!
Literal selection.

Selection restricts generating inferences: when a clause has selected literals, only those literals are overlapped into (and the clause never serves as a from-premise), which prunes the search while preserving completeness so long as only negative literals are selected.

The selection function runs once, when a clause is first processed, and the outcome is cached on the literals through the selected flag.
*/

use crate::{
    config::LiteralSelection,
    ordering::Ocb,
    structures::{eqn::{Eqn, EqnProps}, signature::Signature, term::TermBank},
};

/// Applies `strategy` to a literal list, clearing any earlier selection.
pub fn select_literals(
    strategy: LiteralSelection,
    ocb: &Ocb,
    bank: &TermBank,
    sig: &Signature,
    lits: &mut [Eqn],
) {
    for lit in lits.iter_mut() {
        lit.props -= EqnProps::SELECTED;
    }

    let negatives: Vec<usize> = (0..lits.len()).filter(|&i| lits[i].is_negative()).collect();
    if negatives.is_empty() {
        return;
    }

    match strategy {
        LiteralSelection::NoSelection => {}

        LiteralSelection::SmallestNegative => {
            let chosen = negatives
                .into_iter()
                .min_by_key(|&i| {
                    let lit = &lits[i];
                    (lit.weight(bank), precedence_key(ocb, bank, lit), i)
                })
                .expect("! Nonempty negatives");
            lits[chosen].props |= EqnProps::SELECTED;
        }

        LiteralSelection::AllNegativeInHorn => {
            let positives = lits.len() - negatives.len();
            if positives <= 1 {
                for i in negatives {
                    lits[i].props |= EqnProps::SELECTED;
                }
            }
        }

        LiteralSelection::LargestArityNegative => {
            let chosen = negatives
                .into_iter()
                .max_by_key(|&i| {
                    let lit = &lits[i];
                    let arity = top_arity(bank, sig, lit);
                    // Ties fall to the lighter literal, then the earlier position.
                    (arity, std::cmp::Reverse((lit.weight(bank), i)))
                })
                .expect("! Nonempty negatives");
            lits[chosen].props |= EqnProps::SELECTED;
        }
    }
}

/// The precedence rank of the literal's top symbol, for tie-breaking; variables rank lowest.
fn precedence_key(ocb: &Ocb, bank: &TermBank, lit: &Eqn) -> u32 {
    let node = bank.term(lit.lhs);
    if node.is_var() {
        0
    } else {
        ocb.precedence_rank(node.f_code)
    }
}

fn top_arity(bank: &TermBank, sig: &Signature, lit: &Eqn) -> usize {
    let node = bank.term(lit.lhs);
    if node.is_var() {
        0
    } else {
        sig.arity(node.f_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::signature::Signature;

    #[test]
    fn smallest_negative_breaks_ties_by_precedence() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 1).unwrap();
        let q = sig.insert("q", 1).unwrap();
        let r = sig.insert("r", 1).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let x = bank.variable(-1, crate::structures::term::SORT_INDIVIDUAL);
        let t_px = bank.insert(p, vec![x]).unwrap();
        let t_qx = bank.insert(q, vec![x]).unwrap();
        let t_rx = bank.insert(r, vec![x]).unwrap();

        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        // p(X) | ~q(X) | ~r(X): the negatives weigh the same, so precedence decides.
        let mut lits = vec![
            Eqn::new(&bank, t_px, bank.true_term, true),
            Eqn::new(&bank, t_qx, bank.true_term, false),
            Eqn::new(&bank, t_rx, bank.true_term, false),
        ];

        select_literals(LiteralSelection::SmallestNegative, &ocb, &bank, &sig, &mut lits);

        let q_below_r = matches!(
            ocb.fun_compare(q, r),
            crate::ordering::CompareResult::Lesser
        );
        assert!(!lits[0].is_selected());
        assert_eq!(lits[1].is_selected(), q_below_r);
        assert_eq!(lits[2].is_selected(), !q_below_r);
    }

    #[test]
    fn horn_selection_takes_every_negative() {
        let mut sig = Signature::new();
        let p = sig.insert("p", 0).unwrap();
        let q = sig.insert("q", 0).unwrap();
        sig.refresh_alpha_ranks();

        let mut bank = TermBank::new(&sig);
        let t_p = bank.insert(p, vec![]).unwrap();
        let t_q = bank.insert(q, vec![]).unwrap();
        let ocb = Ocb::new(&sig, &[], 2, 1, 256);

        let mut lits = vec![
            Eqn::new(&bank, t_p, bank.true_term, true),
            Eqn::new(&bank, t_q, bank.true_term, false),
        ];
        select_literals(LiteralSelection::AllNegativeInHorn, &ocb, &bank, &sig, &mut lits);
        assert!(!lits[0].is_selected());
        assert!(lits[1].is_selected());
    }
}
