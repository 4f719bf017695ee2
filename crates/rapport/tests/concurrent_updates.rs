mod common;

use common::sample_store;
use std::collections::BTreeSet;

#[test]
fn test_two_concurrent_updates_both_land() {
    for _ in 0..50 {
        let store = sample_store();
        std::thread::scope(|s| {
            s.spawn(|| store.update("shared", "alice", None, "message from alice"));
            s.spawn(|| store.update("shared", "bob", None, "message from bob"));
        });

        let ctx = store.snapshot("shared").unwrap();
        let contents: BTreeSet<&str> = ctx.messages.iter().map(|m| m.content.as_str()).collect();
        assert!(contents.contains("message from alice"));
        assert!(contents.contains("message from bob"));
        assert_eq!(ctx.messages.len(), 2);
    }
}

#[test]
fn test_many_writers_many_conversations() {
    let store = sample_store();
    std::thread::scope(|s| {
        for t in 0..8 {
            let store = &store;
            s.spawn(move || {
                for i in 0..20 {
                    store.update(&format!("conv-{}", t % 4), "user", None, &format!("t{t} m{i}"));
                }
            });
        }
    });

    for c in 0..4 {
        let ctx = store.snapshot(&format!("conv-{c}")).unwrap();
        // Two writers per conversation, 40 messages total, under the cap
        assert_eq!(ctx.messages.len(), 40);
    }
    assert_eq!(store.conversation_count(), 4);
}
