//! End-to-end coverage of the public `Vfs` API, run against the shipped
//! `BufferDriver` standing in for a mounted "disk" driver.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use vfscore::driver::{BufferDriver, DriverGroup, ResourceDriver};
use vfscore::{Config, CreateInfo, Error, NodeKind, RemoveFlags, Vfs};

fn init() {
    let _ = env_logger::try_init();
}

/// Counts `create` calls so the "invoked exactly once" assertions below are
/// actually checked against the driver, not just the graph shape.
struct CountingDriver {
    inner: BufferDriver,
    creates: AtomicUsize,
}

impl CountingDriver {
    fn new() -> Self {
        Self {
            inner: BufferDriver::new(),
            creates: AtomicUsize::new(0),
        }
    }
    fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

impl ResourceDriver for CountingDriver {
    fn stat(&self, path: &str) -> vfscore::driver::DriverResult<vfscore::Stat> {
        self.inner.stat(path)
    }
    fn locate(&self, path: &str) -> vfscore::driver::DriverResult<vfscore::DriverHandle> {
        self.inner.locate(path)
    }
    fn create(&self, path: &str, mode: u32, kind: NodeKind) -> vfscore::driver::DriverResult<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(path, mode, kind)
    }
    fn remove(&self, path: &str) -> vfscore::driver::DriverResult<()> {
        self.inner.remove(path)
    }
    fn rename(&self, from: &str, to: &str) -> vfscore::driver::DriverResult<()> {
        self.inner.rename(from, to)
    }
    fn open(&self, h: &vfscore::DriverHandle) -> vfscore::driver::DriverResult<()> {
        self.inner.open(h)
    }
    fn close(&self, h: &vfscore::DriverHandle) -> vfscore::driver::DriverResult<()> {
        self.inner.close(h)
    }
    fn read(&self, h: &vfscore::DriverHandle, off: u64, buf: &mut [u8]) -> vfscore::driver::DriverResult<usize> {
        self.inner.read(h, off, buf)
    }
    fn write(&self, h: &vfscore::DriverHandle, off: u64, buf: &[u8]) -> vfscore::driver::DriverResult<usize> {
        self.inner.write(h, off, buf)
    }
    fn seek(&self, h: &vfscore::DriverHandle, pos: vfscore::SeekFrom, cur: u64) -> vfscore::driver::DriverResult<u64> {
        self.inner.seek(h, pos, cur)
    }
}

fn file_info() -> CreateInfo {
    CreateInfo {
        kind: NodeKind::File,
        mode: 0o644,
        exclusive: false,
    }
}

fn mount_counting(vfs: &Vfs) -> Arc<CountingDriver> {
    let driver = Arc::new(CountingDriver::new());
    let mnt = vfs
        .create_path(
            "/mnt",
            CreateInfo {
                kind: NodeKind::Dir,
                mode: 0o755,
                exclusive: false,
            },
        )
        .unwrap();
    // don't release `mnt` before mounting: while it's still a plain Dir with
    // ref_count 0 it's a legitimate eviction candidate, same as any other node
    vfs.mount(
        &mnt,
        Arc::clone(&driver) as Arc<dyn ResourceDriver>,
        DriverGroup::FileSystem,
        10,
        vfscore::DriverHandle(String::new()),
    )
    .unwrap();
    driver
}

/// Mounting a driver and creating a nested path materializes every
/// intermediate component through that driver.
#[test]
fn mount_and_create() {
    init();
    let vfs = Vfs::new(Config::default());
    let driver = mount_counting(&vfs);

    let node = vfs.create_path("/mnt/x/y.txt", file_info()).unwrap();
    // one `create` for the intermediate dir `x`, one for the terminal file
    assert_eq!(driver.create_count(), 2);
    assert_eq!(&*node.name(), "y.txt");
    vfs.release(node).unwrap();

    let dir = vfs.load_path("/mnt/x").unwrap();
    assert_eq!(dir.kind(), NodeKind::Dir);
    vfs.release(dir).unwrap();

    // second load is a graph cache hit: no further driver `create`
    let again = vfs.load_path("/mnt/x/y.txt").unwrap();
    assert_eq!(driver.create_count(), 2);
    vfs.release(again).unwrap();
}

/// Two sequential creates of the same path converge on one node (the
/// driver's own idempotency is exercised rather than genuine thread races,
/// since the lock-hold window is internal to `create_path`).
#[test]
fn repeated_create_is_idempotent() {
    init();
    let vfs = Vfs::new(Config::default());
    let driver = mount_counting(&vfs);

    let first = vfs.create_path("/mnt/a", file_info()).unwrap();
    let second = vfs.create_path("/mnt/a", file_info()).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(driver.create_count(), 1);
    assert_eq!(first.ref_count(), 2);
    vfs.release(first).unwrap();
    vfs.release(second).unwrap();
}

/// Loading a link returns the same node loading its target directly would.
#[test]
fn symlink_resolves_to_target() {
    init();
    let vfs = Vfs::new(Config::default());
    let _driver = mount_counting(&vfs);

    let target = vfs.create_path("/mnt/t.txt", file_info()).unwrap();
    vfs.release(Arc::clone(&target)).unwrap();

    let link = vfs.link("/mnt/t.txt", "/mnt/l", 0o777).unwrap();
    assert_eq!(&*link.name(), "l");
    vfs.release(link).unwrap();

    let resolved = vfs.load_path("/mnt/l").unwrap();
    let expected = vfs.load_path("/mnt/t.txt").unwrap();
    assert!(Arc::ptr_eq(&resolved, &expected));
    vfs.release(resolved).unwrap();
    vfs.release(expected).unwrap();
}

/// A `Link` node whose body resolves nowhere reports a broken link, not a
/// plain not-found.
#[test]
fn broken_link_reports_broken_not_not_found() {
    init();
    let vfs = Vfs::new(Config::default());
    let driver = mount_counting(&vfs);

    // write the link directly through the driver, as if a prior session had
    // written a target that since disappeared; the graph never sees this
    // node until something below `/mnt` is first loaded
    driver.create("broken", 0o777, NodeKind::Link).unwrap();
    let handle = driver.locate("broken").unwrap();
    driver.write(&handle, 0, b"nonexistent").unwrap();

    let err = vfs.load_path("/mnt/broken").unwrap_err();
    assert_eq!(err, Error::BrokenLink);
}

/// With a 2-slot cache, opening and releasing three distinct files evicts
/// the oldest once the third is released.
#[test]
fn eviction_cache_recycles_oldest() {
    init();
    let vfs = Vfs::new(Config {
        eviction_cache_size: 2,
        max_link_hops: 40,
    });
    let driver = mount_counting(&vfs);

    let a = vfs.create_path("/mnt/a", file_info()).unwrap();
    vfs.release(a).unwrap();
    let b = vfs.create_path("/mnt/b", file_info()).unwrap();
    vfs.release(b).unwrap();
    let c = vfs.create_path("/mnt/c", file_info()).unwrap();
    vfs.release(c).unwrap();

    // `a` was evicted from the ring and physically removed; reloading it
    // must materialize a fresh node via the driver
    let before = driver.create_count();
    let reloaded = vfs.load_path("/mnt/a").unwrap_err();
    assert_eq!(reloaded, Error::NotFound);
    assert_eq!(driver.create_count(), before);

    let b_again = vfs.load_path("/mnt/b").unwrap();
    vfs.release(b_again).unwrap();
    let c_again = vfs.load_path("/mnt/c").unwrap();
    vfs.release(c_again).unwrap();
}

/// Renaming a node under a mount updates both the driver's namespace and the
/// in-memory graph.
#[test]
fn rename_within_mount_updates_driver_and_graph() {
    init();
    let vfs = Vfs::new(Config::default());
    let driver = mount_counting(&vfs);

    let node = vfs.create_path("/mnt/src", file_info()).unwrap();
    vfs.release(node).unwrap();

    vfs.rename("/mnt/src", "/mnt/dst").unwrap();

    assert_eq!(vfs.load_path("/mnt/src").unwrap_err(), Error::NotFound);
    let dst = vfs.load_path("/mnt/dst").unwrap();
    assert_eq!(&*dst.name(), "dst");
    vfs.release(dst).unwrap();
    let _ = driver.create_count();
}

/// Root-relative boundary paths (`/`, `/.`, `/..`) all resolve to the root node.
#[test]
fn root_and_dot_paths() {
    init();
    let vfs = Vfs::new(Config::default());
    let root = vfs.load_path("/").unwrap();
    assert!(Arc::ptr_eq(&root, &vfs.root()));
    vfs.release(root).unwrap();

    let root_dot = vfs.load_path("/.").unwrap();
    assert!(Arc::ptr_eq(&root_dot, &vfs.root()));
    vfs.release(root_dot).unwrap();

    let root_dotdot = vfs.load_path("/..").unwrap();
    assert!(Arc::ptr_eq(&root_dotdot, &vfs.root()));
    vfs.release(root_dotdot).unwrap();
}

#[test]
fn remove_on_root_is_in_use() {
    init();
    let vfs = Vfs::new(Config::default());
    let root = vfs.root();
    assert_eq!(vfs.remove(&root, RemoveFlags::PHYSICAL).unwrap_err(), Error::InUse);
}
