mod common;

#[cfg(test)]
mod tests {
    use super::common::{init_logging, LayerError, Recorder, Tracked, UnusedError};
    use chain_core::prelude::*;
    use std::io::Cursor;

    fn stack_of(log: &Recorder, failing: &[usize], layers: usize) -> CloseStack {
        let mut stack = CloseStack::new();
        for id in 1..=layers {
            let layer = Tracked::new(Cursor::new(Vec::<u8>::new()), id, log, failing.contains(&id));
            stack.register(Box::new(layer));
        }
        stack
    }

    #[test]
    fn releases_in_reverse_acquisition_order() {
        init_logging();
        let log = Recorder::new();
        let mut stack = stack_of(&log, &[], 4);

        stack.close().expect("clean close");
        assert_eq!(log.events(), vec!["close 4", "close 3", "close 2", "close 1"]);
        assert!(stack.is_empty());
    }

    #[test]
    fn aggregate_holds_failures_in_release_order() {
        init_logging();
        let log = Recorder::new();
        let err = stack_of(&log, &[2, 4], 4).unwind().expect_err("two layers fail");

        // Every layer is still released.
        assert_eq!(log.events(), vec!["close 4", "close 3", "close 2", "close 1"]);

        let ChainError::Close(aggregate) = &err else {
            panic!("expected an aggregate, got {:?}", err);
        };
        let ids: Vec<_> = aggregate.iter().filter_map(|e| e.find::<LayerError>()).map(|e| e.0).collect();
        assert_eq!(ids, vec![4, 2]);
        assert_eq!(err.to_string(), "[layer 4 failed, layer 2 failed]");

        assert!(err.contains(&LayerError(2)));
        assert!(err.contains(&LayerError(4)));
        assert!(!err.contains(&LayerError(1)));
        assert!(!err.contains(&LayerError(3)));
        assert!(err.find::<UnusedError>().is_none());
    }

    #[test]
    fn single_failure_is_returned_unwrapped() {
        let log = Recorder::new();
        let err = stack_of(&log, &[2], 3).unwind().expect_err("one layer fails");
        assert!(matches!(err, ChainError::Other(_)));
        assert_eq!(err.find::<LayerError>(), Some(&LayerError(2)));
    }

    #[test]
    fn second_close_is_a_no_op() {
        let log = Recorder::new();
        let mut stack = stack_of(&log, &[1], 2);
        assert!(stack.close().is_err());
        stack.close().expect("nothing left to release");
        assert_eq!(log.filtered("close").len(), 2);
    }

    #[test]
    fn push_fn_runs_once_alongside_layers() {
        let log = Recorder::new();
        let mut stack = stack_of(&log, &[], 1);
        let fn_log = log.clone();
        stack.push_fn(move || {
            fn_log.push("release fn");
            Ok(())
        });
        assert_eq!(stack.len(), 2);

        stack.close().expect("clean close");
        stack.close().expect("idempotent");
        assert_eq!(log.events(), vec!["release fn", "close 1"]);
    }

    #[test]
    fn nested_aggregates_are_flattened() {
        let mut inner = CloseErrorStack::new();
        inner.push(ChainError::other(LayerError(1)));
        inner.push(ChainError::other(LayerError(2)));

        let mut outer = CloseErrorStack::new();
        outer.push(ChainError::other(LayerError(3)));
        outer.push(ChainError::Close(inner));

        assert_eq!(outer.len(), 3);
        assert!(outer.contains(&LayerError(1)));
        assert!(outer.any(|e| matches!(e, ChainError::Other(_))));
    }

    #[test]
    fn nop_closer_never_fails() {
        let mut nop = NopCloser(Cursor::new(b"x".to_vec()));
        nop.close().expect("nop close");
        assert_eq!(nop.into_inner().into_inner(), b"x");
    }
}
