use loresheet::content::builtin_actors;
use loresheet::store::{ActorStore, StoreError};
use serde_json::json;

fn seeded_store() -> (tempfile::TempDir, ActorStore) {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in builtin_actors() {
        std::fs::write(dir.path().join(format!("{}.json", name)), body).unwrap();
    }
    let store = ActorStore::new(dir.path());
    (dir, store)
}

#[test]
fn list_is_sorted_and_strips_extension() {
    let (_dir, store) = seeded_store();
    assert_eq!(store.list().unwrap(), vec!["cave_troll", "nurhael"]);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = ActorStore::new(dir.path().join("nope"));
    assert!(matches!(store.list(), Err(StoreError::Io { .. })));
}

#[test]
fn save_then_load_returns_same_json() {
    let (_dir, store) = seeded_store();
    let mut value = store.load("nurhael").unwrap();
    value["system"]["stateOfHealth"]["miserable"]["value"] = json!(true);
    store.save("nurhael", &value).unwrap();

    assert_eq!(store.load("nurhael").unwrap(), value);
    let actor = store.load_actor("nurhael").unwrap();
    assert!(actor.as_character().unwrap().conditions.is_miserable());
}

#[test]
fn saved_files_are_pretty_printed() {
    let (dir, store) = seeded_store();
    store.save("scratch", &json!({ "name": "Scratch", "type": "npc" })).unwrap();
    let text = std::fs::read_to_string(dir.path().join("scratch.json")).unwrap();
    assert_eq!(text, "{\n  \"name\": \"Scratch\",\n  \"type\": \"npc\"\n}");
    assert!(store.list().unwrap().contains(&"scratch".to_string()));
}

#[test]
fn save_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = ActorStore::new(dir.path().join("fresh"));
    store.save("a", &json!({})).unwrap();
    assert_eq!(store.list().unwrap(), vec!["a"]);
}

#[test]
fn load_errors_are_classified() {
    let (dir, store) = seeded_store();
    assert!(matches!(store.load("ghost"), Err(StoreError::NotFound(n)) if n == "ghost"));
    assert!(matches!(store.load("../etc/passwd"), Err(StoreError::InvalidName(_))));

    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    assert!(matches!(store.load("broken"), Err(StoreError::Json { .. })));
}

#[test]
fn bom_prefixed_records_load() {
    let (dir, store) = seeded_store();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{"name":"Bom","type":"npc"}"#);
    std::fs::write(dir.path().join("bom.json"), bytes).unwrap();
    assert_eq!(store.load_actor("bom").unwrap().name(), "Bom");
}

#[test]
fn concurrent_saves_of_one_actor_all_succeed() {
    let (dir, store) = seeded_store();
    let big = json!({ "name": "Race", "notes": "x".repeat(64 * 1024) });
    for _ in 0..20 {
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| store.save("race", &big))).collect();
            for h in handles {
                h.join().unwrap().unwrap();
            }
        });
        assert_eq!(store.load("race").unwrap(), big);
    }
    let leftovers = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_none_or(|x| x != "json"))
        .count();
    assert_eq!(leftovers, 0);
}
