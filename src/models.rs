use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs::Metadata;

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

/// The seven filesystem entry types that get counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Regular,
    Directory,
    Link,
    Fifo,
    Socket,
    Block,
    Character,
}

impl EntryKind {
    /// Report order.
    pub const ALL: [EntryKind; 7] = [
        EntryKind::Regular,
        EntryKind::Directory,
        EntryKind::Link,
        EntryKind::Fifo,
        EntryKind::Socket,
        EntryKind::Block,
        EntryKind::Character,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Regular => "regular",
            EntryKind::Directory => "directory",
            EntryKind::Link => "link",
            EntryKind::Fifo => "fifo",
            EntryKind::Socket => "socket",
            EntryKind::Block => "block",
            EntryKind::Character => "character",
        }
    }

    /// Classifies raw `st_mode` bits. Returns `None` for a type outside the
    /// seven known ones.
    pub fn from_mode(mode: u32) -> Option<EntryKind> {
        match mode & S_IFMT {
            S_IFREG => Some(EntryKind::Regular),
            S_IFDIR => Some(EntryKind::Directory),
            S_IFLNK => Some(EntryKind::Link),
            S_IFIFO => Some(EntryKind::Fifo),
            S_IFSOCK => Some(EntryKind::Socket),
            S_IFBLK => Some(EntryKind::Block),
            S_IFCHR => Some(EntryKind::Character),
            _ => None,
        }
    }

    /// Classifies the metadata of an entry. The metadata must come from
    /// `symlink_metadata` so that links are seen as links.
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<EntryKind> {
        use std::os::unix::fs::MetadataExt;
        Self::from_mode(metadata.mode())
    }

    #[cfg(not(unix))]
    pub fn from_metadata(metadata: &Metadata) -> Option<EntryKind> {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            Some(EntryKind::Link)
        } else if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::Regular)
        } else {
            None
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-type entry counts for one scan.
///
/// All seven categories always exist. Entries of any other type land in a
/// separate `unknown` counter which is never reported as a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTally {
    counts: [u64; 7],
    unknown: u64,
}

impl TypeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EntryKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn record_unknown(&mut self) {
        self.unknown += 1;
    }

    pub fn get(&self, kind: EntryKind) -> u64 {
        self.counts[kind.index()]
    }

    pub fn unknown(&self) -> u64 {
        self.unknown
    }

    /// Sum of the seven category counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(kind, count)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryKind, u64)> + '_ {
        EntryKind::ALL.iter().map(move |&kind| (kind, self.get(kind)))
    }
}

impl Extend<EntryKind> for TypeTally {
    fn extend<I: IntoIterator<Item = EntryKind>>(&mut self, iter: I) {
        for kind in iter {
            self.record(kind);
        }
    }
}

impl FromIterator<EntryKind> for TypeTally {
    fn from_iter<I: IntoIterator<Item = EntryKind>>(iter: I) -> Self {
        let mut tally = TypeTally::new();
        tally.extend(iter);
        tally
    }
}

impl Serialize for TypeTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EntryKind::ALL.len() + 1))?;
        for (kind, count) in self.iter() {
            map.serialize_entry(kind.label(), &count)?;
        }
        map.serialize_entry("unknown", &self.unknown)?;
        map.end()
    }
}
