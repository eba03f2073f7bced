use crate::archive;
use crate::config::Settings;
use crate::context::Context;
use crate::error::Error;
use crate::generator;
use crate::release::ReleaseFile;
use crate::result::Result;
use crate::staging::{METADATA_FILENAME, Staging};
use crate::tpl::Tpl;
use std::fs;
use std::path::{Path, PathBuf};

/// Files written to the working directory by [`package`]
#[derive(Debug)]
pub struct PackageOutput {
    pub release: ReleaseFile,
    pub metadata_path: PathBuf,
    pub product_path: PathBuf,
}

/// Product archive filename with `$RELEASE_NAME` / `$RELEASE_VERSION` expanded
pub fn product_filename(settings: &Settings, release: &ReleaseFile) -> String {
    let mut tpl = Tpl::new();
    tpl.register("RELEASE_NAME", &release.name);
    tpl.register("RELEASE_VERSION", &release.version);
    tpl.parse(&settings.product)
}

/// Assemble `release_path` and its generated metadata into a product archive.
///
/// The filename is validated before anything is written. Outside the
/// temporary staging tree only `metadata.yml` and the product archive are
/// written, both into the working directory.
pub fn package(ctx: &Context, settings: &Settings, release_path: &Path) -> Result<PackageOutput> {
    let release = ReleaseFile::parse(release_path)?;

    cliclack::log::info(format!("release_filename: {}", release.stem()))?;
    cliclack::log::info(format!("release_name: {}", release.name))?;
    cliclack::log::info(format!("release_version: {}", release.version))?;

    if !release.path.is_file() {
        return Err(Error::ReleaseNotFound(release.path.clone()));
    }

    let manifest = {
        let spinner = cliclack::spinner();
        spinner.start("Generating metadata...");
        match generator::generate(ctx, settings, &release) {
            Ok(manifest) => {
                spinner.stop("Metadata generated");
                manifest
            }
            Err(e) => {
                spinner.error("Metadata generation failed");
                return Err(e);
            }
        }
    };

    let staging = Staging::create()?;
    staging.write_metadata(&manifest)?;

    let metadata_path = ctx.work_dir.join(METADATA_FILENAME);
    fs::write(&metadata_path, &manifest)?;

    staging.add_release(&release, settings.release_mode)?;
    log::debug!(
        "staged {} ({:?}) in {}",
        release.filename,
        settings.release_mode,
        staging.root().display()
    );

    let product_path = ctx.work_dir.join(product_filename(settings, &release));
    archive::remove_existing(&product_path);

    let spinner = cliclack::spinner();
    spinner.start("Creating product archive...");
    if let Err(e) = archive::create(ctx, &settings.archiver, staging.root(), &product_path) {
        spinner.error("Archive creation failed");
        return Err(e);
    }
    spinner.stop("Product archive created");

    Ok(PackageOutput {
        release,
        metadata_path,
        product_path,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{Archiver, Interpolator, ReleaseMode};
    use crate::test_utils::{process_lock, script};
    use std::fs::File;
    use std::io::Read;
    use tempfile::TempDir;
    use zip::ZipArchive;

    struct Fixture {
        work: TempDir,
        release_path: PathBuf,
        settings: Settings,
    }

    fn fixture(generator_body: &str, mode: ReleaseMode) -> Fixture {
        let work = TempDir::new().unwrap();
        fs::create_dir_all(work.path().join("example")).unwrap();
        let template = work.path().join("example/metadata.yml");
        fs::write(&template, "name: ((bosh_release_name))\n").unwrap();

        let release_dir = work.path().join("input");
        fs::create_dir_all(&release_dir).unwrap();
        let release_path = release_dir.join("foo-1.2.3.tgz");
        fs::write(&release_path, b"release tarball bytes").unwrap();

        let generator = script(work.path(), "generator", generator_body);
        let settings = Settings {
            template,
            product: "example-0.0-build.0.pivotal".to_string(),
            generator,
            interpolator: Interpolator::Builtin,
            archiver: Archiver::Builtin,
            release_mode: mode,
        };
        Fixture {
            work,
            release_path,
            settings,
        }
    }

    fn ctx(fixture: &Fixture) -> Context {
        Context::new(fixture.work.path().to_path_buf(), false)
    }

    fn read_entry(path: &Path, name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut buf = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_product_filename_expansion() {
        let settings = Settings {
            template: PathBuf::new(),
            product: "$RELEASE_NAME-$RELEASE_VERSION-build.0.pivotal".to_string(),
            generator: String::new(),
            interpolator: Interpolator::Builtin,
            archiver: Archiver::Builtin,
            release_mode: ReleaseMode::Copy,
        };
        let release = ReleaseFile::parse(Path::new("foo-1.2.3.tgz")).unwrap();
        assert_eq!(
            product_filename(&settings, &release),
            "foo-1.2.3-build.0.pivotal"
        );
    }

    #[test]
    fn test_package_copies_release() {
        let _guard = process_lock();
        let f = fixture("cat \"$5\"; echo 'label: Foo'", ReleaseMode::Copy);

        let output = package(&ctx(&f), &f.settings, &f.release_path).unwrap();
        assert_eq!(
            output.product_path,
            f.work.path().join("example-0.0-build.0.pivotal")
        );
        assert_eq!(
            fs::read_to_string(&output.metadata_path).unwrap(),
            "name: 'foo'\nlabel: Foo\n"
        );
        assert_eq!(
            read_entry(&output.product_path, "metadata/metadata.yml"),
            b"name: 'foo'\nlabel: Foo\n"
        );
        assert_eq!(
            read_entry(&output.product_path, "releases/foo-1.2.3.tgz"),
            b"release tarball bytes"
        );
    }

    #[test]
    fn test_package_placeholder() {
        let _guard = process_lock();
        let f = fixture("echo 'name: foo'", ReleaseMode::Placeholder);

        let output = package(&ctx(&f), &f.settings, &f.release_path).unwrap();
        assert!(read_entry(&output.product_path, "releases/foo-1.2.3.tgz").is_empty());
    }

    #[test]
    fn test_malformed_filename_writes_nothing() {
        let _guard = process_lock();
        let f = fixture("echo 'name: foo'", ReleaseMode::Copy);
        let bad = f.work.path().join("input/foo.tgz");
        fs::write(&bad, b"x").unwrap();

        let err = package(&ctx(&f), &f.settings, &bad).unwrap_err();
        assert!(matches!(err, Error::InvalidReleaseFilename { .. }));
        assert!(!f.work.path().join("metadata.yml").exists());
        assert!(!f.work.path().join("example-0.0-build.0.pivotal").exists());
    }

    #[test]
    fn test_missing_release() {
        let _guard = process_lock();
        let f = fixture("echo 'name: foo'", ReleaseMode::Copy);
        let missing = f.work.path().join("input/bar-2.0.0.tgz");

        let err = package(&ctx(&f), &f.settings, &missing).unwrap_err();
        assert!(matches!(err, Error::ReleaseNotFound(_)));
        assert!(!f.work.path().join("metadata.yml").exists());
    }

    #[test]
    fn test_generator_failure_keeps_previous_archive() {
        let _guard = process_lock();
        let f = fixture("exit 1", ReleaseMode::Copy);
        let product = f.work.path().join("example-0.0-build.0.pivotal");
        fs::write(&product, b"previous").unwrap();

        assert!(package(&ctx(&f), &f.settings, &f.release_path).is_err());
        assert!(!f.work.path().join("metadata.yml").exists());
        assert_eq!(fs::read(&product).unwrap(), b"previous");
    }
}
