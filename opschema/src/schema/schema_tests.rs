//! Behavioural tests for OpSchema verification and output calculation.

#[cfg(test)]
mod tests {
    use crate::definition::OperatorDef;
    use crate::errors::SchemaViolation;
    use crate::schema::{Cardinality, OpSchema, CANNOT_COMPUTE_NUM_OUTPUTS};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::Arc;

    fn def(num_inputs: usize, num_outputs: usize) -> OperatorDef {
        OperatorDef::new("Op")
            .with_inputs((0..num_inputs).map(|i| format!("in{i}")))
            .with_outputs((0..num_outputs).map(|i| format!("out{i}")))
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    #[test]
    fn test_exact_inputs_independent_of_outputs() {
        let schema = OpSchema::new().num_inputs(2);

        for outputs in 0..4 {
            assert!(schema.verify(&def(2, outputs)));
            assert!(!schema.verify(&def(1, outputs)));
            assert!(!schema.verify(&def(3, outputs)));
        }
    }

    #[test]
    fn test_input_range_boundaries() {
        let schema = OpSchema::new().num_inputs_between(2, 4);

        assert!(!schema.verify(&def(1, 0)));
        assert!(schema.verify(&def(2, 0)));
        assert!(schema.verify(&def(3, 0)));
        assert!(schema.verify(&def(4, 0)));
        assert!(!schema.verify(&def(5, 0)));
    }

    #[test]
    fn test_range_starting_at_zero() {
        let schema = OpSchema::new().num_inputs_between(0, 1);
        assert!(schema.verify(&def(0, 0)));
        assert!(schema.verify(&def(1, 0)));
        assert!(!schema.verify(&def(2, 0)));
    }

    #[test]
    fn test_default_schema_accepts_any_count() {
        let schema = OpSchema::new();

        for inputs in 0..5 {
            for outputs in 0..5 {
                assert!(schema.verify(&def(inputs, outputs)));
            }
        }
        assert_eq!(schema.min_inputs(), 0);
        assert_eq!(schema.max_inputs(), None);
        assert_eq!(schema.min_outputs(), 0);
        assert_eq!(schema.max_outputs(), None);
    }

    #[test]
    fn test_default_schema_rejects_inplace() {
        let schema = OpSchema::new();
        let aliased = OperatorDef::new("Op").input("X").output("X");

        assert_eq!(
            schema.check(&aliased),
            Err(SchemaViolation::InplaceNotAllowed { input: 0, output: 0 })
        );
    }

    #[test]
    fn test_output_set_and_predicate() {
        let set = OpSchema::new().num_outputs_in([1, 3]);
        assert!(set.verify(&def(0, 1)));
        assert!(!set.verify(&def(0, 2)));
        assert!(set.verify(&def(0, 3)));

        let even = OpSchema::new().num_outputs_with(|n| n % 2 == 0);
        assert!(even.verify(&def(0, 0)));
        assert!(!even.verify(&def(0, 1)));
        assert!(even.verify(&def(0, 2)));
    }

    #[test]
    fn test_predicate_resets_bounds() {
        let schema = OpSchema::new()
            .num_inputs_between(1, 2)
            .num_inputs_with(|n| n > 5);

        assert_eq!(schema.min_inputs(), 0);
        assert_eq!(schema.max_inputs(), None);
        assert!(schema.verify(&def(6, 0)));
        assert!(!schema.verify(&def(1, 0)));
    }

    #[test]
    fn test_same_number_of_output() {
        let schema = OpSchema::new().same_number_of_output();

        for k in [0, 1, 2, 17, 1000] {
            assert_eq!(schema.calculate_output(k), Some(k));
            assert_eq!(schema.calculate_output_or_sentinel(k), i64::try_from(k).unwrap());
        }
    }

    #[test]
    fn test_no_calculator_cannot_compute() {
        let schema = OpSchema::new().num_inputs(1).num_outputs(1);

        for k in 0..8 {
            assert_eq!(schema.calculate_output(k), None);
            assert_eq!(schema.calculate_output_or_sentinel(k), CANNOT_COMPUTE_NUM_OUTPUTS);
        }
    }

    #[test]
    fn test_custom_output_calculator() {
        let schema = OpSchema::new().output_calculator(|n| n * 2);
        assert_eq!(schema.calculate_output(3), Some(6));
    }

    #[test]
    fn test_calculator_last_write_wins() {
        let schema = OpSchema::new()
            .output_calculator(|n| n + 1)
            .same_number_of_output();
        assert_eq!(schema.calculate_output(4), Some(4));
    }

    #[test]
    fn test_add_scenario() {
        let schema = OpSchema::new()
            .num_inputs(2)
            .num_outputs(1)
            .allow_one_to_one_inplace();

        let inplace_first = OperatorDef::new("Add").with_inputs(["X", "Y"]).output("X");
        assert!(schema.verify(&inplace_first));

        let three_inputs = OperatorDef::new("Add").with_inputs(["X", "Y", "W"]).output("Z");
        assert!(!schema.verify(&three_inputs));

        let inplace_second = OperatorDef::new("Add").with_inputs(["X", "Y"]).output("Y");
        assert!(!schema.verify(&inplace_second));
        assert_eq!(
            schema.check(&inplace_second),
            Err(SchemaViolation::InplaceNotAllowed { input: 1, output: 0 })
        );
    }

    #[test]
    fn test_split_scenario() {
        let schema = OpSchema::new().num_inputs(1).num_outputs_in([2, 3, 4]);

        for k in 0..6 {
            assert_eq!(schema.calculate_output(k), None);
        }
        assert!(!schema.verify(&def(1, 1)));
        assert!(schema.verify(&def(1, 2)));
        assert!(schema.verify(&def(1, 4)));
        assert!(!schema.verify(&def(1, 5)));
    }

    #[test]
    fn test_enforced_pair_is_implicitly_allowed() {
        let schema = OpSchema::new().enforce_one_to_one_inplace();

        let aliased = OperatorDef::new("Op").with_inputs(["X", "Y"]).with_outputs(["X", "Y"]);
        assert!(schema.verify(&aliased));
        assert!(schema.is_inplace_allowed(1, 1));
        assert!(!schema.is_inplace_allowed(0, 1));
    }

    #[test]
    fn test_enforced_pair_must_be_aliased() {
        let schema = OpSchema::new().enforce_inplace([(0, 0)]);

        let not_aliased = OperatorDef::new("Op").input("X").output("Y");
        assert_eq!(
            schema.check(&not_aliased),
            Err(SchemaViolation::InplaceNotEnforced { input: 0, output: 0 })
        );
    }

    #[test]
    fn test_enforced_pair_out_of_range_is_ignored() {
        let schema = OpSchema::new().enforce_inplace([(2, 2)]);
        let small = OperatorDef::new("Op").input("X").output("Y");
        assert!(schema.verify(&small));
    }

    #[test]
    fn test_explicit_pairs_and_predicate_allow() {
        let pairs = OpSchema::new().allow_inplace([(1, 0)]);
        let reuse_second = OperatorDef::new("Op").with_inputs(["X", "Y"]).output("Y");
        let reuse_first = OperatorDef::new("Op").with_inputs(["X", "Y"]).output("X");
        assert!(pairs.verify(&reuse_second));
        assert!(!pairs.verify(&reuse_first));

        let any = OpSchema::new().allow_inplace_with(|_, _| true);
        assert!(any.verify(&reuse_second));
        assert!(any.verify(&reuse_first));
    }

    #[test]
    fn test_enforce_with_predicate() {
        let schema = OpSchema::new()
            .allow_inplace_with(|_, _| true)
            .enforce_inplace_with(|input, output| input == 0 && output == 1);

        let good = OperatorDef::new("Op").input("X").with_outputs(["Y", "X"]);
        let bad = OperatorDef::new("Op").input("X").with_outputs(["X", "Y"]);
        assert!(schema.verify(&good));
        assert!(!schema.verify(&bad));
    }

    #[test]
    fn test_allow_last_write_wins() {
        let schema = OpSchema::new()
            .allow_inplace_with(|_, _| true)
            .allow_inplace([(0, 0)]);

        let cross = OperatorDef::new("Op").with_inputs(["X", "Y"]).output("Y");
        assert!(!schema.verify(&cross));
    }

    #[test]
    fn test_input_count_checked_before_output_count() {
        let schema = OpSchema::new().num_inputs(1).num_outputs(1);

        let violation = schema.check(&def(2, 2)).unwrap_err();
        assert_eq!(
            violation,
            SchemaViolation::InputCount {
                actual: 2,
                expected: "exactly 1".to_string(),
            }
        );
    }

    #[test]
    fn test_count_checked_before_inplace() {
        let schema = OpSchema::new().num_outputs(2);
        let aliased = OperatorDef::new("Op").input("X").output("X");

        assert!(matches!(
            schema.check(&aliased),
            Err(SchemaViolation::OutputCount { actual: 1, .. })
        ));
    }

    #[test]
    fn test_disallowed_reported_before_missing_enforcement() {
        // Pair (0, 0) is aliased without permission; pair (0, 1) is enforced
        // but not aliased. The earlier pair wins.
        let schema = OpSchema::new().enforce_inplace([(0, 1)]);
        let def = OperatorDef::new("Op").input("X").with_outputs(["X", "Z"]);

        assert_eq!(
            schema.check(&def),
            Err(SchemaViolation::InplaceNotAllowed { input: 0, output: 0 })
        );
    }

    #[test]
    fn test_origin_defaults_to_unknown() {
        let schema = OpSchema::new();
        assert_eq!(schema.file(), "unknown");
        assert_eq!(schema.line(), 0);

        let placed = OpSchema::at("ops/math.rs", 42);
        assert_eq!(placed.file(), "ops/math.rs");
        assert_eq!(placed.line(), 42);
    }

    #[test]
    fn test_schema_debug_renders_rules() {
        let schema = OpSchema::new()
            .with_input_cardinality(Cardinality::Exact(2))
            .num_outputs_with(|_| true);
        let rendered = format!("{schema:?}");

        assert!(rendered.contains("Exact(2)"));
        assert!(rendered.contains("Custom(<predicate>)"));
    }

    #[test]
    fn test_reconfiguration_is_logged() {
        let (schema, logs) = with_captured_logs(|| OpSchema::new().num_inputs(1).num_inputs(2));

        assert!(schema.verify(&def(2, 0)));
        assert!(logs.contains("last configuration wins"));
        assert!(logs.contains("input count"));
    }

    #[test]
    fn test_empty_range_is_logged() {
        let (_, logs) = with_captured_logs(|| OpSchema::new().num_outputs_between(3, 1));
        assert!(logs.contains("accepts no count"));
    }

    #[test]
    fn test_verify_does_not_log() {
        let schema = OpSchema::new().num_inputs(2).allow_one_to_one_inplace();
        let ((), logs) = with_captured_logs(|| {
            assert!(!schema.verify(&def(1, 1)));
            assert!(schema.verify(&def(2, 1)));
            let _ = schema.calculate_output(2);
        });

        assert!(logs.is_empty());
    }

    #[test]
    fn test_verify_through_dyn_descriptor() {
        use crate::definition::OperatorDescriptor;

        let schema = OpSchema::new().num_inputs(1);
        let boxed: Box<dyn OperatorDescriptor> = Box::new(def(1, 0));
        assert!(schema.verify(boxed.as_ref()));
    }
}
