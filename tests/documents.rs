//! Document open/drop adaptors against a scripted engine

mod common;

use common::{CORRUPT, FAILS_ON_DROP, FakeEngine, UNWINDS, WELL_FORMED, capture, fixture};
use faster_raster::fitz::document::{drop_document, open_document};
use faster_raster::{Context, Error, LockRegistry};
use std::ffi::CString;
use std::sync::Arc;
use std::sync::atomic::Ordering;

fn locked_context(engine: &FakeEngine) -> Context<FakeEngine> {
    let registry = Arc::new(LockRegistry::new().unwrap());
    Context::new(engine.clone(), Some(registry), 0).unwrap()
}

#[test]
fn test_open_well_formed() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "ok.pdf", WELL_FORMED);
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let (doc, log) = capture(|| ctx.open_document(&path));
    let doc = doc.unwrap();
    assert!(!doc.as_ptr().is_null());
    assert_eq!(doc.path(), path);
    assert!(log.lines().is_empty());

    drop(doc);
    assert_eq!(engine.stats.opened.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stats.dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn test_open_missing_logs_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let (result, log) = capture(|| ctx.open_document(dir.path().join("absent.pdf")));
    assert!(matches!(result, Err(Error::Native(_))));
    let lines = log.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("cannot open document: cannot open file"));
    assert!(lines[0].contains("absent.pdf"));
}

#[test]
fn test_open_corrupt_logs_one_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "corrupt.pdf", CORRUPT);
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let (result, log) = capture(|| ctx.open_document(&path));
    assert!(result.is_err());
    let lines = log.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("cannot open document: no objects found"));
    assert_eq!(engine.stats.opened.load(Ordering::SeqCst), 0);
}

#[test]
fn test_raw_adaptor_returns_null_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let good = fixture(dir.path(), "good.pdf", WELL_FORMED);
    let bad = fixture(dir.path(), "bad.pdf", CORRUPT);
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let good = CString::new(good.to_str().unwrap()).unwrap();
    let bad = CString::new(bad.to_str().unwrap()).unwrap();

    let (doc, log) = capture(|| unsafe { open_document(&engine, ctx.as_ptr(), good.as_ptr()) });
    assert!(!doc.is_null());
    assert!(log.lines().is_empty());

    let (null, log) = capture(|| unsafe { open_document(&engine, ctx.as_ptr(), bad.as_ptr()) });
    assert!(null.is_null());
    assert_eq!(log.lines().len(), 1);

    unsafe { drop_document(&engine, ctx.as_ptr(), doc) };
    assert_eq!(engine.stats.dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn test_engine_unwind_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "unwinds.pdf", UNWINDS);
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let (result, log) = capture(|| ctx.open_document(&path));
    assert!(matches!(result, Err(Error::Panic(_))));
    let lines = log.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("cannot open document: native call panicked"));
    // The registry was not left locked by the unwind.
    assert!(!ctx.locks().unwrap().is_locked(0).unwrap());
}

#[test]
fn test_drop_failure_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "sticky.pdf", FAILS_ON_DROP);
    let engine = FakeEngine::default();
    let ctx = locked_context(&engine);

    let doc = ctx.open_document(&path).unwrap();
    let ((), log) = capture(|| doc.close());
    let lines = log.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains("cannot drop document: cannot drop a document still in use"));
    assert_eq!(engine.stats.dropped.load(Ordering::SeqCst), 1);
}

#[test]
fn test_context_outlives_documents_and_releases_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "ok.pdf", WELL_FORMED);
    let engine = FakeEngine::default();
    let registry = Arc::new(LockRegistry::new().unwrap());
    {
        let ctx = Context::new(engine.clone(), Some(Arc::clone(&registry)), 0).unwrap();
        let a = ctx.open_document(&path).unwrap();
        let b = ctx.open_document(&path).unwrap();
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert_eq!(Arc::strong_count(&registry), 2);
    }
    assert_eq!(Arc::strong_count(&registry), 1);
    assert_eq!(engine.stats.contexts.load(Ordering::SeqCst), 0);
    assert_eq!(engine.stats.opened.load(Ordering::SeqCst), 2);
    assert_eq!(engine.stats.dropped.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_contexts_share_one_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = fixture(dir.path(), "ok.pdf", WELL_FORMED);
    let engine = FakeEngine::default();
    let registry = Arc::new(LockRegistry::new().unwrap());

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let registry = Arc::clone(&registry);
            let path = path.clone();
            std::thread::spawn(move || {
                let ctx = Context::new(engine, Some(registry), 0).unwrap();
                for _ in 0..50 {
                    ctx.open_document(&path).unwrap().close();
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    assert_eq!(engine.stats.opened.load(Ordering::SeqCst), 400);
    assert_eq!(engine.stats.dropped.load(Ordering::SeqCst), 400);
    assert_eq!(engine.stats.max_inside.load(Ordering::SeqCst), 1);
    assert_eq!(Arc::strong_count(&registry), 1);
}
