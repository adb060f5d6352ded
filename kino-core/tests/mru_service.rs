mod support;

use kino_core::MruListService;
use tempfile::TempDir;

use support::media_file;

#[test]
fn add_deduplicates_and_orders_most_recent_first() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");
    let a = media_file(&dir, "a.mkv");
    let b = media_file(&dir, "b.mkv");

    let mru = MruListService::new(&store);
    mru.add(&a);
    mru.add(&b);
    mru.add(&a);

    let items = mru.items().borrow().clone();
    assert_eq!(items.len(), 2);
    assert!(items[0].matches_path(&a));
    assert!(items[1].matches_path(&b));
}

#[test]
fn dedup_ignores_path_case() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");
    let a = media_file(&dir, "movie.mkv");

    let mru = MruListService::new(&store);
    mru.add(&a);
    mru.add(dir.path().join("MOVIE.MKV"));

    assert_eq!(mru.items().borrow().len(), 1);
}

#[test]
fn list_is_capped_at_capacity() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");

    let mru = MruListService::new(&store);
    for i in 0..15 {
        mru.add(media_file(&dir, &format!("clip{i}.mkv")));
    }

    let items = mru.items().borrow().clone();
    assert_eq!(items.len(), MruListService::DEFAULT_CAPACITY);
    // Most recent first, oldest dropped.
    assert!(items[0].matches_path(&dir.path().join("clip14.mkv")));
    assert!(items[9].matches_path(&dir.path().join("clip5.mkv")));
}

#[test]
fn remove_drops_the_entry_and_persists() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");
    let a = media_file(&dir, "a.mkv");
    let b = media_file(&dir, "b.mkv");

    let mru = MruListService::new(&store);
    mru.add(&a);
    mru.add(&b);
    mru.remove(&a);

    let items = mru.items().borrow().clone();
    assert_eq!(items.len(), 1);
    assert!(items[0].matches_path(&b));

    let contents = std::fs::read_to_string(&store).unwrap();
    assert!(!contents.contains("a.mkv"));
}

#[test]
fn load_survives_restart_and_drops_vanished_paths() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");
    let a = media_file(&dir, "a.mkv");
    let b = media_file(&dir, "b.mkv");

    {
        let mru = MruListService::new(&store);
        mru.add(&a);
        mru.add(&b);
    }

    std::fs::remove_file(&a).unwrap();

    let mru = MruListService::new(&store);
    let items = mru.items().borrow().clone();
    assert_eq!(items.len(), 1);
    assert!(items[0].matches_path(&b));
}

#[test]
fn load_caps_an_overlong_store_at_capacity() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("mrulist.txt");

    // A store written by an older build may exceed the cap.
    let mut paths = Vec::new();
    let mut contents = String::new();
    for i in 0..15 {
        let path = media_file(&dir, &format!("clip{i}.mkv"));
        contents.push_str(&path.to_string_lossy());
        contents.push('\n');
        if i == 7 {
            contents.push('\n');
        }
        paths.push(path);
    }
    std::fs::write(&store, contents).unwrap();

    let mru = MruListService::new(&store);
    let items = mru.items().borrow().clone();
    assert_eq!(items.len(), MruListService::DEFAULT_CAPACITY);
    // File order is preserved; the blank line is skipped, the tail dropped.
    assert!(items[0].matches_path(&paths[0]));
    assert!(items[9].matches_path(&paths[9]));
}

#[test]
fn missing_store_loads_empty() {
    let dir = TempDir::new().unwrap();
    let mru = MruListService::new(dir.path().join("nope.txt"));
    assert!(mru.items().borrow().is_empty());
}
