use std::path::{PathBuf, Path};
use std::fs;
use std::env;
use std::ffi::OsString;
use duct::{cmd, Expression};
use cargo_metadata::MetadataCommand;
use anyhow::anyhow;
use crate::metadata::{Metadata, Overrides};
use crate::toolchain::Toolchain;

pub mod metadata;
mod toolchain;

/// Where each stage of the build lands.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub staticlib: PathBuf,
    pub elf: PathBuf,
    pub hex: PathBuf,
}

impl Artifacts {
    pub fn new(out_dir: &Path, package: &str) -> Artifacts {
        let staticlib = out_dir.join(format!("lib{}.a", package.replace('-', "_")));

        let mut elf = out_dir.join(package);
        elf.set_extension("elf");

        let mut hex = out_dir.join(package);
        hex.set_extension("hex");

        Artifacts { staticlib, elf, hex }
    }
}

pub struct Builder {
    cargo_metadata: cargo_metadata::Metadata,
    metadata: Metadata,
    target: String,
    target_triple: String,
    profile: String,
    verbose: bool,
}

impl Builder {
    /// Create a new firmware builder.
    pub fn new(manifest_path: Option<impl Into<PathBuf>>) -> anyhow::Result<Builder> {
        let sdk_home = env::var("MD2MSX_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| "/usr/share/md2msx".into());

        let mut cargo_metadata = MetadataCommand::new();

        if let Some(manifest_path) = manifest_path {
            cargo_metadata.manifest_path(manifest_path);
        }

        let cargo_metadata = cargo_metadata.exec()?;
        let mut target = env::var("MD2MSX_TARGET")
            .unwrap_or_else(|_| "avr-unknown-gnu-atmega328".into());

        let mut target_json = sdk_home.join("targets");
        target_json.push(&target);
        target_json.set_extension("json");
        if fs::metadata(&target_json).map_or(false, |m| m.is_file()) {
            target = target_json.to_string_lossy().into_owned();
        }

        let root_package = cargo_metadata.root_package()
            .ok_or(anyhow!("missing root package"))?;
        let package_dir = root_package.manifest_path.parent()
            .unwrap_or(Path::new(""));

        let mut metadata = if let Some(c) = root_package.metadata.get("md2msx") {
            serde_json::from_value(c.clone())?
        } else {
            Metadata::default()
        };

        let local_config = package_dir.join("Md2msx.toml");
        if fs::metadata(&local_config).map_or(false, |m| m.is_file()) {
            let overrides: Overrides = toml::from_str(&fs::read_to_string(&local_config)?)?;
            metadata = metadata.apply(overrides);
        }

        if let Ok(port) = env::var("MD2MSX_PORT") {
            metadata.port = Some(port);
        }

        let target_triple = {
            let filename =
                Path::new(&target)
                    .file_name()
                    .map(Path::new);
            let stem = filename
                .and_then(|f| f.file_stem())
                .map(|p| Path::new(p));
            stem.and_then(|s| s.to_str())
                .unwrap_or("").to_string()
        };

        Ok(Builder {
            cargo_metadata,
            metadata,
            target,
            target_triple,
            profile: "release".into(),
            verbose: false,
        })
    }

    /// Enable verbose logging.
    pub fn verbose(mut self, v: bool) -> Self {
        self.verbose = v;
        self
    }

    /// Build for a PCB revision other than the manifest's.
    pub fn pcb(mut self, pcb: Option<String>) -> Self {
        if pcb.is_some() {
            self.metadata.pcb = pcb;
        }
        self
    }

    /// Flash through a serial port other than the configured one.
    pub fn port(mut self, port: Option<String>) -> Self {
        if port.is_some() {
            self.metadata.port = port;
        }
        self
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn root(&self) -> anyhow::Result<&cargo_metadata::Package> {
        self.cargo_metadata.root_package()
            .ok_or(anyhow!("missing root package"))
    }

    fn artifacts(&self) -> anyhow::Result<Artifacts> {
        let mut out_dir = self.cargo_metadata.target_directory.clone();
        out_dir.push(&self.target_triple);
        out_dir.push(&self.profile);
        Ok(Artifacts::new(&out_dir, &self.root()?.name))
    }

    fn run(&self, expression: Expression) -> anyhow::Result<()> {
        if self.verbose {
            eprintln!("     Running {:?}", expression);
        }
        expression.run()?;
        Ok(())
    }

    /// Build the firmware and return the path of the Intel HEX image.
    pub fn build(&self) -> anyhow::Result<PathBuf> {
        let toolchain = Toolchain::from_environment()?;
        let root = self.root()?;
        let artifacts = self.artifacts()?;

        let mut args: Vec<OsString> = vec![
            "build".into(),
            "--manifest-path".into(), root.manifest_path.clone().into(),
            "-Z".into(), "build-std=core".into(),
            "--profile".into(), self.profile.clone().into(),
            "--target".into(), self.target.clone().into()];

        if let Some(pcb) = self.metadata.pcb.as_ref() {
            let feature = metadata::pcb_feature(pcb)
                .filter(|f| root.features.contains_key(f))
                .ok_or_else(|| anyhow!("unknown PCB revision {}", pcb))?;
            args.push("--no-default-features".into());
            args.push("--features".into());
            args.push(feature.into());
        }

        if self.verbose {
            args.push("-v".into());
        }
        self.run(cmd("cargo", &args))?;

        let mcu = format!("-mmcu={}", self.metadata.mcu);
        self.run(cmd!(toolchain.gcc(), &mcu, "-Os", "-Wl,--gc-sections",
            "-o", &artifacts.elf, &artifacts.staticlib))?;

        self.run(cmd!(toolchain.objcopy(), "-O", "ihex", "-R", ".eeprom",
            &artifacts.elf, &artifacts.hex))?;

        Ok(artifacts.hex)
    }

    /// Build the firmware and write it to the board.
    pub fn flash(&self) -> anyhow::Result<()> {
        let hex = self.build()?;
        let toolchain = Toolchain::from_environment()?;
        let port = self.metadata.port.as_ref()
            .ok_or(anyhow!("no serial port configured, pass --port or set MD2MSX_PORT"))?;

        let image = {
            let mut arg = OsString::from("flash:w:");
            arg.push(&hex);
            arg.push(":i");
            arg
        };

        self.run(cmd!(toolchain.avrdude(),
            "-p", &self.metadata.mcu,
            "-c", &self.metadata.programmer,
            "-P", port,
            "-b", self.metadata.baud.to_string(),
            "-D", "-U", image))
    }
}
