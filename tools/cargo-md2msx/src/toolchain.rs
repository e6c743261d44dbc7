use std::{env, io};
use std::path::PathBuf;

pub struct Toolchain {
    bin_dir: Option<PathBuf>,
    avrdude: PathBuf,
}

fn env_path(name: &str) -> io::Result<Option<PathBuf>> {
    match env::var(name) {
        Ok(s) => Ok(Some(s.into())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) =>
            Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not valid utf-8", name))),
    }
}

impl Toolchain {
    /// Fetch the AVR toolchain from the environment. AVR_TOOLCHAIN names the
    /// directory holding avr-gcc and friends, and AVRDUDE the programmer;
    /// otherwise both are looked up on the PATH.
    pub fn from_environment() -> io::Result<Toolchain> {
        let bin_dir = env_path("AVR_TOOLCHAIN")?;
        let avrdude = env_path("AVRDUDE")?.unwrap_or_else(|| "avrdude".into());
        Ok(Toolchain::new(bin_dir, avrdude))
    }

    pub fn new(bin_dir: Option<PathBuf>, avrdude: PathBuf) -> Toolchain {
        Toolchain { bin_dir, avrdude }
    }

    fn tool(&self, name: &str) -> PathBuf {
        match self.bin_dir.as_ref() {
            Some(dir) => dir.join(name),
            None => name.into(),
        }
    }

    /// Return the path to avr-gcc, used as the linker.
    pub fn gcc(&self) -> PathBuf {
        self.tool("avr-gcc")
    }

    /// Return the path to avr-objcopy.
    pub fn objcopy(&self) -> PathBuf {
        self.tool("avr-objcopy")
    }

    /// Return the path to avrdude.
    pub fn avrdude(&self) -> PathBuf {
        self.avrdude.clone()
    }
}
