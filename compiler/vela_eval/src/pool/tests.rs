use super::*;
use crate::activation::{EmptyActivation, MapActivation};
use pretty_assertions::assert_eq;

#[test]
fn test_checkout_binds_name_without_value() {
    let pool = ActivationPool::new();
    let scratch = pool.checkout("acc");
    assert_eq!(scratch.name(), "acc");
    assert_eq!(scratch.value(), None);
    assert_eq!(pool.outstanding(), 1);
}

#[test]
fn test_drop_returns_slot() {
    let pool = ActivationPool::new();
    {
        let mut scratch = pool.checkout("x");
        scratch.set(Value::Int(1));
    }
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(pool.retained(), 1);
}

#[test]
fn test_reused_slot_is_cleared() {
    let pool = ActivationPool::new();
    let first_addr = {
        let mut scratch = pool.checkout("x");
        scratch.set(Value::Int(7));
        scratch.slot_addr()
    };
    let scratch = pool.checkout("y");
    assert_eq!(scratch.slot_addr(), first_addr);
    assert_eq!(scratch.name(), "y");
    assert_eq!(scratch.value(), None);
}

#[test]
fn test_retention_is_bounded() {
    let pool = ActivationPool::with_capacity(2);
    {
        let _a = pool.checkout("a");
        let _b = pool.checkout("b");
        let _c = pool.checkout("c");
        assert_eq!(pool.outstanding(), 3);
    }
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(pool.retained(), 2);
}

#[test]
fn test_slot_released_on_panic() {
    let pool = ActivationPool::new();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut scratch = pool.checkout("x");
        scratch.set(Value::Int(1));
        panic!("boom");
    }));
    assert!(result.is_err());
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(pool.retained(), 1);
}

#[test]
fn test_scope_shadows_parent() {
    let pool = ActivationPool::new();
    let parent = MapActivation::new()
        .with("x", Value::Int(1))
        .with("y", Value::Int(2));
    let mut scratch = pool.checkout("x");
    scratch.set(Value::Int(10));
    let scope = scratch.scope(&parent);
    assert_eq!(scope.resolve("x"), Some(Value::Int(10)));
    assert_eq!(scope.resolve("y"), Some(Value::Int(2)));
}

#[test]
fn test_unset_scope_falls_through() {
    let pool = ActivationPool::new();
    let parent = MapActivation::new().with("x", Value::Int(1));
    let scratch = pool.checkout("x");
    assert_eq!(scratch.scope(&parent).resolve("x"), Some(Value::Int(1)));
    assert_eq!(scratch.scope(&EmptyActivation).resolve("x"), None);
}

#[test]
fn test_concurrent_checkouts_never_share_a_slot() {
    use rustc_hash::FxHashSet;

    let pool = ActivationPool::new();
    let threads = 8;
    let rounds = 200;
    let barrier = std::sync::Barrier::new(threads);

    std::thread::scope(|s| {
        for t in 0..threads {
            let pool = &pool;
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                for i in 0..rounds {
                    let mut a = pool.checkout("a");
                    let mut b = pool.checkout("b");
                    assert_ne!(a.slot_addr(), b.slot_addr());
                    a.set(Value::Int(i64::try_from(t * rounds + i).unwrap()));
                    b.set(Value::Bool(true));
                    // A slot shared with another thread would show a foreign value here.
                    assert_eq!(
                        a.value(),
                        Some(&Value::Int(i64::try_from(t * rounds + i).unwrap()))
                    );
                }
            });
        }
    });

    assert_eq!(pool.outstanding(), 0);

    // Every retained slot is a distinct allocation.
    let guards: Vec<_> = (0..pool.retained()).map(|_| pool.checkout("z")).collect();
    let addrs: FxHashSet<usize> = guards.iter().map(Scratch::slot_addr).collect();
    assert_eq!(addrs.len(), guards.len());
}
