//! End-to-end filtered walk tests.
//!
//! Each case builds a small source tree, walks it into a fresh destination
//! and checks which entries were mirrored.

use siftcopy::executor::AtomicCopier;
use siftcopy::filter::{ExclusionMatcher, ExclusionSpec};
use siftcopy::types::{Decision, ReasonCode, SizeBounds};
use siftcopy::walker::{FilteredWalker, WalkOptions, WalkReport};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const NONE: &[&str] = &[];

struct Fixture {
    _temp: TempDir,
    src: PathBuf,
    dst: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().expect("create tempdir");
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir(&src).expect("create src dir");
        Self {
            _temp: temp,
            src,
            dst,
        }
    }

    fn file(&self, relative: &str, size: usize) -> &Self {
        let path = self.src.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        let content: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        fs::write(&path, content).expect("write source file");
        self
    }

    fn dir(&self, relative: &str) -> &Self {
        fs::create_dir_all(self.src.join(relative)).expect("create source dir");
        self
    }

    fn walk(&self, spec: ExclusionSpec, bounds: SizeBounds) -> WalkReport {
        let matcher = ExclusionMatcher::new(spec);
        FilteredWalker::new(&matcher, bounds, &AtomicCopier)
            .with_options(WalkOptions {
                sorted: true,
                ..WalkOptions::default()
            })
            .walk(&self.src, &self.dst)
            .expect("walk should succeed")
    }

    fn spec(&self, dirs: &[&str], files: &[&str], names: &[&str]) -> ExclusionSpec {
        ExclusionSpec::resolve(&self.src, dirs, files, names).expect("resolve spec")
    }

    fn copied(&self, relative: &str) -> bool {
        self.dst.join(relative).exists()
    }
}

/// Every file under `root`, as sorted relative paths
fn relative_files(root: &Path) -> Vec<PathBuf> {
    fn collect(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).expect("read dir") {
            let path = entry.expect("dir entry").path();
            if path.is_dir() {
                collect(root, &path, out);
            } else {
                out.push(path.strip_prefix(root).expect("under root").to_path_buf());
            }
        }
    }
    let mut out = Vec::new();
    if root.exists() {
        collect(root, root, &mut out);
    }
    out.sort();
    out
}

#[test]
fn test_retained_files_are_mirrored_with_identical_bytes() {
    let fx = Fixture::new();
    fx.file("a.txt", 10)
        .file("x/b.bin", 300)
        .file("x/y/z/c.dat", 4096);

    let report = fx.walk(ExclusionSpec::empty(), SizeBounds::unbounded());

    assert_eq!(report.files_copied, 3);
    for relative in ["a.txt", "x/b.bin", "x/y/z/c.dat"] {
        assert_eq!(
            fs::read(fx.src.join(relative)).expect("read source"),
            fs::read(fx.dst.join(relative)).expect("read destination"),
            "{} must be byte-identical",
            relative
        );
    }
    assert_eq!(relative_files(&fx.src), relative_files(&fx.dst));
}

#[test]
fn test_bounds_and_bare_name_together() {
    let fx = Fixture::new();
    fx.file("a.txt", 500)
        .file("sub/b.txt", 50)
        .file("sub/skip/c.txt", 10);

    let report = fx.walk(
        fx.spec(NONE, NONE, &["skip"]),
        SizeBounds::new(Some(100), Some(1000)),
    );

    assert!(fx.copied("a.txt"));
    assert!(fx.copied("sub"), "sub/ is mirrored eagerly");
    assert!(!fx.copied("sub/b.txt"), "50 bytes is below the 100 byte minimum");
    assert!(!fx.copied("sub/skip"));
    assert!(!fx.copied("sub/skip/c.txt"));
    assert_eq!(report.excluded_for(ReasonCode::NameMatch), 1);
    assert_eq!(report.excluded_for(ReasonCode::SizeOutOfRange), 1);
}

#[test]
fn test_size_bounds_are_inclusive() {
    let fx = Fixture::new();
    fx.file("below.bin", 99)
        .file("at_min.bin", 100)
        .file("middle.bin", 500)
        .file("at_max.bin", 1000)
        .file("above.bin", 1001);

    fx.walk(ExclusionSpec::empty(), SizeBounds::new(Some(100), Some(1000)));

    assert!(!fx.copied("below.bin"));
    assert!(fx.copied("at_min.bin"));
    assert!(fx.copied("middle.bin"));
    assert!(fx.copied("at_max.bin"));
    assert!(!fx.copied("above.bin"));
}

#[test]
fn test_zero_byte_files_with_unset_bounds_are_copied() {
    let fx = Fixture::new();
    fx.file("empty.txt", 0).file("full.txt", 5);

    fx.walk(ExclusionSpec::empty(), SizeBounds::new(None, None));

    assert!(fx.copied("empty.txt"));
    assert!(fx.copied("full.txt"));
}

#[test]
fn test_bounds_do_not_apply_to_directories() {
    let fx = Fixture::new();
    fx.dir("empty_dir").file("deep/small.txt", 1);

    fx.walk(ExclusionSpec::empty(), SizeBounds::new(Some(1000), Some(2000)));

    assert!(fx.dst.join("empty_dir").is_dir());
    assert!(fx.dst.join("deep").is_dir());
    assert!(!fx.copied("deep/small.txt"));
}

#[test]
fn test_bare_name_excluded_at_every_depth() {
    let fx = Fixture::new();
    fx.file("node_modules/pkg/index.js", 10)
        .file("app/node_modules/lib.js", 10)
        .file("app/deep/er/node_modules/x.js", 10)
        .file("app/src/node_modules", 10)
        .file("app/src/main.js", 10);

    let report = fx.walk(fx.spec(NONE, NONE, &["node_modules"]), SizeBounds::unbounded());

    assert_eq!(
        relative_files(&fx.dst),
        vec![PathBuf::from("app/src/main.js")]
    );
    assert!(!fx.copied("node_modules"));
    assert!(!fx.copied("app/node_modules"));
    assert!(!fx.copied("app/deep/er/node_modules"));
    assert_eq!(report.excluded_dirs, 3);
    assert_eq!(report.excluded_files, 1);
}

#[test]
fn test_absolute_directory_exclusion_drops_subtree() {
    let fx = Fixture::new();
    fx.file("keep/a.txt", 1)
        .file("drop/b.txt", 1)
        .file("drop/inner/c.txt", 1);
    let absolute = fx.src.join("drop").to_string_lossy().to_string();

    let report = fx.walk(fx.spec(&[absolute.as_str()], NONE, NONE), SizeBounds::unbounded());

    assert!(fx.copied("keep/a.txt"));
    assert!(!fx.copied("drop"));
    assert_eq!(report.excluded_for(ReasonCode::AbsoluteMatch), 1);
}

#[test]
fn test_relative_directory_exclusion_is_location_specific() {
    let fx = Fixture::new();
    fx.file("sub/dir/a.txt", 1)
        .file("other/dir/b.txt", 1)
        .file("dir/c.txt", 1);

    let report = fx.walk(fx.spec(&["sub/dir"], NONE, NONE), SizeBounds::unbounded());

    assert!(!fx.copied("sub/dir"));
    assert!(fx.copied("sub"));
    assert!(fx.copied("other/dir/b.txt"));
    assert!(fx.copied("dir/c.txt"));
    assert_eq!(report.excluded_for(ReasonCode::RelativeMatch), 1);
}

#[test]
fn test_file_exclusions_by_each_rule() {
    let fx = Fixture::new();
    fx.file("abs.txt", 1)
        .file("nested/rel.txt", 1)
        .file("one/.DS_Store", 1)
        .file("two/.DS_Store", 1)
        .file("kept.txt", 1);
    let absolute = fx.src.join("abs.txt").to_string_lossy().to_string();

    fx.walk(
        fx.spec(NONE, &[absolute.as_str(), "nested/rel.txt", ".DS_Store"], NONE),
        SizeBounds::unbounded(),
    );

    assert_eq!(relative_files(&fx.dst), vec![PathBuf::from("kept.txt")]);
    assert!(fx.dst.join("one").is_dir());
}

#[test]
fn test_nonexistent_absolute_exclusion_has_no_effect() {
    let fx = Fixture::new();
    fx.file("a.txt", 1).file("sub/b.txt", 1);
    let stale = fx.src.join("gone").to_string_lossy().to_string();
    let stale_file = fx.src.join("sub/gone.txt").to_string_lossy().to_string();

    let spec = fx.spec(&[stale.as_str()], &[stale_file.as_str()], NONE);
    assert_eq!(spec.stale_entries().len(), 2);
    let report = fx.walk(spec, SizeBounds::unbounded());

    assert_eq!(relative_files(&fx.src), relative_files(&fx.dst));
    assert_eq!(report.excluded_dirs + report.excluded_files, 0);
}

#[test]
fn test_destination_is_pure_relabeling_of_source() {
    let fx = Fixture::new();
    fx.file("a/b/c/d.txt", 3)
        .file("a/b/e.txt", 3)
        .file("a/skip/f.txt", 3)
        .file("g.txt", 3);

    let decisions: Arc<Mutex<Vec<Decision>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&decisions);
    let callback = move |decision: &Decision| {
        sink.lock().expect("lock decisions").push(decision.clone());
    };

    let matcher = ExclusionMatcher::new(fx.spec(NONE, NONE, &["skip"]));
    FilteredWalker::new(&matcher, SizeBounds::unbounded(), &AtomicCopier)
        .on_decision(&callback)
        .walk(&fx.src, &fx.dst)
        .expect("walk should succeed");

    let decisions = decisions.lock().expect("lock decisions");
    let copied: Vec<&Decision> = decisions.iter().filter(|d| d.is_copied()).collect();
    assert_eq!(copied.len(), 6, "3 dirs + 3 files");
    for decision in copied {
        let destination = decision.destination.as_ref().expect("copied has destination");
        assert_eq!(
            destination.strip_prefix(&fx.dst).expect("under dst"),
            decision.path.strip_prefix(&fx.src).expect("under src")
        );
        assert!(destination.exists());
    }
}

#[test]
fn test_walk_into_existing_destination_is_idempotent() {
    let fx = Fixture::new();
    fx.file("sub/a.txt", 8);

    fx.walk(ExclusionSpec::empty(), SizeBounds::unbounded());
    let report = fx.walk(ExclusionSpec::empty(), SizeBounds::unbounded());

    assert_eq!(report.files_copied, 1);
    assert_eq!(relative_files(&fx.dst), vec![PathBuf::from("sub/a.txt")]);
}

#[test]
fn test_relative_exclusion_naming_source_root() {
    let fx = Fixture::new();
    fx.file("cache/a.txt", 1).file("kept/b.txt", 1);

    // Source root is ".../src", so "src/cache" names the root's own child
    fx.walk(fx.spec(&["src/cache"], NONE, NONE), SizeBounds::unbounded());

    assert!(!fx.copied("cache"));
    assert!(fx.copied("kept/b.txt"));
}

#[test]
fn test_part_suffixed_sibling_is_mirrored() {
    let fx = Fixture::new();
    fx.file("a.txt", 7).file("a.txt.part", 11).file("sub/b", 3).file("sub/b.part", 5);

    let matcher = ExclusionMatcher::default();
    // Listing order, so either name may be copied first
    let report = FilteredWalker::new(&matcher, SizeBounds::unbounded(), &AtomicCopier)
        .walk(&fx.src, &fx.dst)
        .expect("walk should succeed");

    assert_eq!(report.files_copied, 4);
    assert_eq!(relative_files(&fx.src), relative_files(&fx.dst));
    for relative in ["a.txt", "a.txt.part", "sub/b", "sub/b.part"] {
        assert_eq!(
            fs::read(fx.src.join(relative)).expect("read source"),
            fs::read(fx.dst.join(relative)).expect("read destination"),
            "{} must be byte-identical",
            relative
        );
    }
}
