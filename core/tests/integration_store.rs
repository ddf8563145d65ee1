use folio_core::{MemoryMessageStore, MessageId, MessageStore, NewContactMessage};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn input(name: &str) -> NewContactMessage {
    NewContactMessage::new(name, format!("{}@example.com", name), "Hello there")
}

#[test]
fn test_ids_unique_across_threads() {
    let store = Arc::new(MemoryMessageStore::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            std::thread::spawn(move || {
                (0..250)
                    .map(|n| store.create(input(&format!("t{}-{}", t, n))).unwrap().id)
                    .collect::<Vec<MessageId>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {}", id);
        }
    }

    assert_eq!(seen.len(), 2000);
    assert_eq!(store.len(), 2000);
    assert_eq!(store.list().unwrap().len(), 2000);
}

#[test]
fn test_unknown_id_not_found() {
    let store = MemoryMessageStore::new();
    for n in 0..10 {
        store.create(input(&format!("v{}", n))).unwrap();
    }

    let never_created: MessageId = "00000000-0000-4000-8000-000000000000".parse().unwrap();
    assert_eq!(store.get(&never_created).unwrap(), None);
}

#[test]
fn test_store_usable_as_trait_object() {
    let store: Arc<dyn MessageStore> = Arc::new(MemoryMessageStore::new());
    assert!(store.is_empty());

    let created = store.create(input("ana")).unwrap();
    assert_eq!(store.get(&created.id).unwrap().as_ref(), Some(&created));
    assert_eq!(store.list().unwrap(), vec![created]);
}

proptest! {
    #[test]
    fn prop_created_messages_round_trip_through_get(
        fields in prop::collection::vec((".{0,24}", ".{0,24}", ".{0,64}"), 1..20)
    ) {
        let store = MemoryMessageStore::new();
        let mut ids = HashSet::new();

        for (name, email, message) in fields {
            let created = store
                .create(NewContactMessage::new(name.clone(), email.clone(), message.clone()))
                .unwrap();
            prop_assert!(ids.insert(created.id));
            prop_assert_eq!(&created.name, &name);
            prop_assert_eq!(&created.email, &email);
            prop_assert_eq!(&created.message, &message);
            prop_assert_eq!(store.get(&created.id).unwrap(), Some(created));
        }
    }

    #[test]
    fn prop_list_is_reverse_creation_order(count in 0usize..40) {
        let store = MemoryMessageStore::new();
        let mut created = Vec::new();
        for n in 0..count {
            created.push(store.create(input(&format!("v{}", n))).unwrap());
        }
        created.reverse();

        let listed = store.list().unwrap();
        prop_assert!(listed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        prop_assert_eq!(listed, created);
    }
}
