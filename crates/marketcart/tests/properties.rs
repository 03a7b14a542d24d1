use std::sync::Arc;

use marketcart::core::decode;
use marketcart::{CartConfig, CartHandle, CartStore, Mutation};
use marketcart_testkit::{apply_ops, cart_ops, CartOp, RecordingStore};
use proptest::prelude::*;

fn run(handle: &CartHandle, op: &CartOp) -> Mutation {
    match op {
        CartOp::Add(product) => handle.add_to_cart(product.clone()),
        CartOp::Increment(id) => handle.increment(id),
        CartOp::Decrement(id) => handle.decrement(id),
    }
    .expect("scope open")
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_store_matches_plain_cart_and_persists_every_change(ops in cart_ops(40)) {
        let rt = runtime();
        let (persisted, changes, writes) = rt.block_on(async {
            let backing = Arc::new(RecordingStore::new());
            let cart_store = CartStore::new(Arc::clone(&backing), CartConfig::default());
            let handle = cart_store.handle();

            let changes = ops.iter().filter(|op| run(&handle, op).is_change()).count();
            cart_store.close().await.expect("close");

            (persisted_cart(&backing), changes, backing.write_count())
        });

        prop_assert_eq!(writes, changes);
        prop_assert_eq!(persisted, apply_ops(&ops));
    }

    #[test]
    fn prop_reload_restores_last_state(ops in cart_ops(30)) {
        let rt = runtime();
        let expected = apply_ops(&ops);

        let restored = rt.block_on(async {
            let backing = Arc::new(RecordingStore::new());

            let first = CartStore::new(Arc::clone(&backing), CartConfig::default());
            let handle = first.handle();
            for op in &ops {
                run(&handle, op);
            }
            first.close().await.expect("close");

            let second = CartStore::open(Arc::clone(&backing), CartConfig::default()).await;
            second.snapshot()
        });

        prop_assert_eq!(restored, expected);
    }
}

/// Decode whatever the store holds last, or an empty cart.
fn persisted_cart(store: &RecordingStore) -> marketcart::Cart {
    store
        .last_value()
        .map(|raw| decode(&raw).expect("decodes"))
        .unwrap_or_default()
}
