use egret_prover::{
    config::{Config, LiteralSelection},
    context::Context,
    derivation::DerivationStep,
    procedures::rewriting::rewrite_literals,
    reports::Report,
    structures::term::RewriteLevel,
};

mod demodulation {

    use super::*;

    #[test]
    fn forward_contraction_rewrites_and_records_the_demodulator() {
        let mut ctx = Context::from_config(Config::default());

        // The rule enters first (it is lighter), the target is rewritten when picked.
        ctx.read_problem(
            "cnf(rule, axiom, f(g(X))=h(X)).\ncnf(target, axiom, (p(f(g(a))) | q(X))).".as_bytes(),
        )
        .unwrap();
        let rule = 0;
        let target = 1;

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));

        // p(f(g(a))) | q(X) became p(h(a)) | q(X), with the rewrite on record.
        let h = ctx.signature.code_of("h").unwrap();
        let a = ctx.signature.code_of("a").unwrap();
        let p = ctx.signature.code_of("p").unwrap();
        let t_a = ctx.terms.insert(a, vec![]).unwrap();
        let t_ha = ctx.terms.insert(h, vec![t_a]).unwrap();
        let t_pha = ctx.terms.insert(p, vec![t_ha]).unwrap();

        let rewritten = ctx.store.get(target);
        assert!(rewritten.literals.iter().any(|lit| lit.lhs == t_pha));
        assert!(rewritten.derivation.contains(&DerivationStep::Rewrite(rule)));
    }

    #[test]
    fn rewriting_twice_changes_nothing() {
        let mut ctx = Context::from_config(Config::default());

        ctx.read_problem(
            "cnf(rule, axiom, f(g(X))=h(X)).\ncnf(target, axiom, (p(f(g(a))) | q(X))).".as_bytes(),
        )
        .unwrap();
        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));

        // Idempotence against an unchanged state, clause by clause.
        // Demodulators are passed over: a rule is not rewritten while it serves as one.
        let ocb = ctx.ocb.as_ref().unwrap();
        for clause in ctx.store.iter() {
            if clause.is_demodulator() {
                continue;
            }
            let mut literals = clause.literals.clone();
            let used = rewrite_literals(
                ocb,
                &mut ctx.terms,
                &ctx.store,
                &ctx.pos_rules,
                &ctx.pos_eqns,
                &mut literals,
                RewriteLevel::Full,
                ctx.demod_date,
            )
            .unwrap();

            assert!(used.is_empty(), "Clause {} re-rewritten", clause.id);
            assert_eq!(literals.len(), clause.literals.len());
            for (after, before) in literals.iter().zip(clause.literals.iter()) {
                assert_eq!(after.lhs, before.lhs);
                assert_eq!(after.rhs, before.rhs);
            }
        }
    }

    #[test]
    fn backward_rewriting_reclaims_processed_clauses() {
        let mut config = Config::default();
        // Expensive variables make the rule arrive second, forcing the backward path.
        config.fun_weight.value = 1;
        config.var_weight.value = 5;

        let mut ctx = Context::from_config(config);
        ctx.read_problem(
            "cnf(heavy, axiom, p(f(f(f(a))))).\ncnf(rule, axiom, f(X)=X).".as_bytes(),
        )
        .unwrap();

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));
        assert!(ctx.counters.backward_rewritten >= 1);

        // The heavy clause collapsed to p(a).
        let p = ctx.signature.code_of("p").unwrap();
        let a = ctx.signature.code_of("a").unwrap();
        let t_a = ctx.terms.insert(a, vec![]).unwrap();
        let t_pa = ctx.terms.insert(p, vec![t_a]).unwrap();

        let collapsed = ctx
            .store
            .iter()
            .any(|clause| !clause.is_dead() && clause.literals.iter().any(|lit| lit.lhs == t_pa));
        assert!(collapsed);
    }
}

mod selection {

    use super::*;

    #[test]
    fn the_smallest_negative_literal_is_selected() {
        let mut config = Config::default();
        config.literal_selection.value = LiteralSelection::SmallestNegative;

        let mut ctx = Context::from_config(config);
        ctx.read_problem("cnf(mixed, axiom, (p(X) | ~q(X) | ~r(X))).".as_bytes())
            .unwrap();

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));

        let q = ctx.signature.code_of("q").unwrap();
        let r = ctx.signature.code_of("r").unwrap();
        let ocb = ctx.ocb.as_ref().unwrap();
        let q_first = ocb.precedence_rank(q) < ocb.precedence_rank(r);

        let clause = ctx.store.get(0);
        for lit in &clause.literals {
            let top = ctx.terms.term(lit.lhs).f_code;
            if top == q {
                assert_eq!(lit.is_selected(), q_first);
            } else if top == r {
                assert_eq!(lit.is_selected(), !q_first);
            } else {
                assert!(!lit.is_selected());
            }
        }
    }

    #[test]
    fn no_selection_leaves_every_flag_clear() {
        let mut config = Config::default();
        config.literal_selection.value = LiteralSelection::NoSelection;

        let mut ctx = Context::from_config(config);
        ctx.read_problem("cnf(mixed, axiom, (p(X) | ~q(X) | ~r(X))).".as_bytes())
            .unwrap();

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));
        assert!(ctx.store.get(0).literals.iter().all(|lit| !lit.is_selected()));
    }
}

mod unit_cuts {

    use super::*;

    #[test]
    fn unorientable_units_cut_by_simplify_reflect() {
        let mut ctx = Context::from_config(Config::default());

        // f(X)=g(Y) cannot demodulate --- no instance is oriented --- yet it
        // cuts the negative literal by simplify-reflect.
        ctx.read_problem(
            "cnf(unit, axiom, f(X)=g(Y)).\ncnf(target, axiom, (f(a)!=g(b) | q(b))).".as_bytes(),
        )
        .unwrap();

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));

        let target = ctx.store.get(1);
        assert_eq!(target.len(), 1);
        assert!(target.literals[0].is_positive());
        assert!(target.derivation.iter().any(|step| matches!(step, DerivationStep::SR(0))));
    }

    #[test]
    fn subsumed_clauses_are_dropped() {
        let mut ctx = Context::from_config(Config::default());

        // The unorientable unit subsumes the wider clause outright.
        ctx.read_problem(
            "cnf(general, axiom, f(X)=g(Y)).\ncnf(instance, axiom, (f(a)=g(b) | q(a))).".as_bytes(),
        )
        .unwrap();

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));
        assert!(ctx.store.get(1).is_dead());
        assert!(ctx.counters.forward_subsumed + ctx.counters.backward_subsumed >= 1);
    }
}

mod tautologies {

    use super::*;

    #[test]
    fn equational_tautologies_are_discarded_during_saturation() {
        let mut ctx = Context::from_config(Config::default());

        // a=c | a!=b | b!=c is a tautology by ground completion, found once picked.
        ctx.read_problem(
            "cnf(taut, axiom, (a=c | a!=b | b!=c)).\ncnf(keep, axiom, p(a)).".as_bytes(),
        )
        .unwrap();
        assert_eq!(ctx.unprocessed.len(), 2);

        assert_eq!(ctx.saturate(), Ok(Report::Satisfiable));
        assert_eq!(ctx.processed_count(), 1);
        assert!(ctx.counters.tautologies >= 1);
    }
}
