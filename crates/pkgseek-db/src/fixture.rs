//! Builders for on-disk pacman databases used by tests.
//!
//! The layout is the one libalpm reads: `local/<name>-<version>/desc` next to an
//! `ALPM_DB_VERSION` file, and `sync/<repo>.db` tar archives. Versions must carry a pkgrel
//! (`1.0-1`), libalpm splits directory names on it.

use std::{fmt::Write as _, fs, io::Write, path::Path};

/// Local database schema written by pacman 6 and later.
const LOCAL_DB_VERSION: u32 = 9;

/// Compression applied to a fixture sync database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncCompression {
    None,
    Gzip,
    Zstd,
}

/// A package entry to be written into a fixture database.
#[derive(Debug, Clone, Default)]
pub struct FixturePackage {
    name: String,
    version: String,
    base: Option<String>,
    desc: String,
    url: Option<String>,
    arch: String,
    build_date: i64,
    packager: String,
    licenses: Vec<String>,
    provides: Vec<String>,
    conflicts: Vec<String>,
    depends: Vec<String>,
    make_depends: Vec<String>,
    check_depends: Vec<String>,
    opt_depends: Vec<String>,
    split_depends: bool,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl FixturePackage {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            arch: "x86_64".to_string(),
            build_date: 1_700_000_000,
            packager: "Test Packager <test@example.org>".to_string(),
            ..Default::default()
        }
    }

    pub fn base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn desc(mut self, desc: &str) -> Self {
        self.desc = desc.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn build_date(mut self, build_date: i64) -> Self {
        self.build_date = build_date;
        self
    }

    pub fn licenses(mut self, licenses: &[&str]) -> Self {
        self.licenses = owned(licenses);
        self
    }

    pub fn provides(mut self, provides: &[&str]) -> Self {
        self.provides = owned(provides);
        self
    }

    pub fn conflicts(mut self, conflicts: &[&str]) -> Self {
        self.conflicts = owned(conflicts);
        self
    }

    pub fn depends(mut self, depends: &[&str]) -> Self {
        self.depends = owned(depends);
        self
    }

    pub fn make_depends(mut self, depends: &[&str]) -> Self {
        self.make_depends = owned(depends);
        self
    }

    pub fn check_depends(mut self, depends: &[&str]) -> Self {
        self.check_depends = owned(depends);
        self
    }

    pub fn opt_depends(mut self, depends: &[&str]) -> Self {
        self.opt_depends = owned(depends);
        self
    }

    /// Writes dependency fields into a separate `depends` file, like older sync databases.
    pub fn split_depends(mut self) -> Self {
        self.split_depends = true;
        self
    }

    fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    fn desc_file(&self, local: bool) -> String {
        let mut out = String::new();
        push_field(&mut out, "NAME", &[self.name.clone()]);
        push_field(&mut out, "VERSION", &[self.version.clone()]);
        push_field(
            &mut out,
            "BASE",
            &[self.base.clone().unwrap_or_else(|| self.name.clone())],
        );
        if !self.desc.is_empty() {
            push_field(&mut out, "DESC", &[self.desc.clone()]);
        }
        if let Some(url) = &self.url {
            push_field(&mut out, "URL", &[url.clone()]);
        }
        if !local {
            push_field(
                &mut out,
                "FILENAME",
                &[format!("{}-{}.pkg.tar.zst", self.dir_name(), self.arch)],
            );
        }
        push_field(&mut out, "ARCH", &[self.arch.clone()]);
        push_field(&mut out, "BUILDDATE", &[self.build_date.to_string()]);
        if local {
            push_field(&mut out, "INSTALLDATE", &[(self.build_date + 60).to_string()]);
        }
        push_field(&mut out, "PACKAGER", &[self.packager.clone()]);
        push_field(&mut out, "LICENSE", &self.licenses);
        push_field(&mut out, "CONFLICTS", &self.conflicts);
        if !self.split_depends {
            out.push_str(&self.depends_file());
        }
        out
    }

    fn depends_file(&self) -> String {
        let mut out = String::new();
        push_field(&mut out, "DEPENDS", &self.depends);
        push_field(&mut out, "PROVIDES", &self.provides);
        push_field(&mut out, "MAKEDEPENDS", &self.make_depends);
        push_field(&mut out, "CHECKDEPENDS", &self.check_depends);
        push_field(&mut out, "OPTDEPENDS", &self.opt_depends);
        out
    }
}

fn push_field(out: &mut String, field: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    let _ = writeln!(out, "%{field}%");
    for value in values {
        let _ = writeln!(out, "{value}");
    }
    out.push('\n');
}

/// Writes `packages` as the local database below `db_path`.
pub fn write_local(db_path: &Path, packages: &[FixturePackage]) {
    let local = db_path.join("local");
    fs::create_dir_all(&local).expect("create local db dir");
    fs::write(local.join("ALPM_DB_VERSION"), format!("{LOCAL_DB_VERSION}\n"))
        .expect("write db version");
    for pkg in packages {
        let dir = local.join(pkg.dir_name());
        fs::create_dir_all(&dir).expect("create package dir");
        let mut content = pkg.desc_file(true);
        if pkg.split_depends {
            content.push_str(&pkg.depends_file());
        }
        fs::write(dir.join("desc"), content).expect("write desc");
    }
}

/// Writes `packages` as the sync database `repo` below `db_path`.
pub fn write_sync(
    db_path: &Path,
    repo: &str,
    packages: &[FixturePackage],
    compression: SyncCompression,
) {
    let mut builder = tar::Builder::new(Vec::new());
    for pkg in packages {
        append_file(&mut builder, &format!("{}/desc", pkg.dir_name()), &pkg.desc_file(false));
        if pkg.split_depends {
            append_file(
                &mut builder,
                &format!("{}/depends", pkg.dir_name()),
                &pkg.depends_file(),
            );
        }
    }
    let archive = builder.into_inner().expect("finish tar archive");

    let data = match compression {
        SyncCompression::None => archive,
        SyncCompression::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&archive).expect("gzip archive");
            encoder.finish().expect("finish gzip")
        }
        SyncCompression::Zstd => zstd::encode_all(archive.as_slice(), 0).expect("zstd archive"),
    };

    let sync = db_path.join("sync");
    fs::create_dir_all(&sync).expect("create sync db dir");
    fs::write(sync.join(format!("{repo}.db")), data).expect("write sync db");
}

fn append_file(builder: &mut tar::Builder<Vec<u8>>, path: &str, content: &str) {
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_entry_type(tar::EntryType::Regular);
    builder
        .append_data(&mut header, path, content.as_bytes())
        .expect("append tar entry");
}
