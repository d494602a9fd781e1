use crate::{
    alphabet,
    error::{HwError, HwErrorExt, Result},
    s,
};
use std::path::{Path, PathBuf};

macro_rules! config {
    ($($field:ident : $ty:ty $default:block),* $(,)?) => {
        paste::paste! {
            mod default {
                use super::*;
                $(pub fn $field() -> $ty $default)*
            }

            #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
            pub struct Config {
                $(
                    #[serde(default = "default::" $field)]
                    pub $field: $ty,
                )*

                #[serde(skip)]
                had_error_parsing: bool,
            }

            impl Config {
                pub fn new() -> Self {
                    Self {
                        $($field: default::$field(),)*
                        had_error_parsing: false,
                    }
                }
            }
        }
    };
}

config!(
    alphabet: Vec<String> { alphabet::default_alphabet() },
    start_label: String { String::from("a") },
    export_file_name: String { String::from("tmpStrokeStorage.json") },
    pretty_export: bool { false },
    eraser_radius: f32 { 10. },
);

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    fn with_error(self) -> Config {
        Config {
            had_error_parsing: true,
            ..self
        }
    }

    pub fn with_alphabet(alphabet: Vec<String>) -> Config {
        Config {
            alphabet,
            ..Config::new()
        }
    }

    pub fn had_error_parsing(&self) -> bool {
        self.had_error_parsing
    }

    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or_else(|| {
            HwError::from(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config directory",
            ))
        })?;
        path.push("handwriting");

        if !path.exists() {
            std::fs::create_dir_all(&path)?;
        }

        path.push("config.ron");
        Ok(path)
    }

    pub fn from_ron_str(contents: &str) -> Result<Config> {
        Ok(ron::from_str(contents)?)
    }

    /// Missing files give the defaults. Broken files also give the defaults, but are never
    /// overwritten by [Config::save].
    pub fn from_disk(path: &Path) -> Config {
        tracing::info!("load config from {}", path.display());
        let file = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Config::default();
            }
            Err(err) => {
                HwError::from(err)
                    .problem(s!(CouldNotOpenConfigFile))
                    .display();
                return Config::default().with_error();
            }
        };

        match Config::from_ron_str(&file) {
            Ok(config) => config,
            Err(err) => {
                err.problem(s!(CouldNotOpenConfigFile)).display();
                Config::default().with_error()
            }
        }
    }

    pub fn to_ron_string(&self) -> Result<String> {
        let contents = ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::new()
                .new_line(String::from("\n"))
                .indentor(String::from("  "))
                .compact_arrays(true),
        )?;

        Ok(format!(
            "// this file generated automatically.\n// do not edit while collecting!!\n{contents}"
        ))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        tracing::info!("save config to {}", path.display());

        if self.had_error_parsing {
            // don't overwrite broken configs
            tracing::error!("had error");
            return Ok(());
        }

        std::fs::write(path, self.to_ron_string()?)
            .map_err(HwError::from)
            .problem(s!(CouldNotOpenConfigFile))
    }

    /// The label selected when a session starts. Falls back to the first of the alphabet.
    pub fn start_label(&self) -> &str {
        if self.alphabet.iter().any(|label| *label == self.start_label) {
            &self.start_label
        } else {
            self.alphabet
                .first()
                .map(String::as_str)
                .unwrap_or(&self.start_label)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_round_trips() {
        let config = Config::new();
        let ron = config.to_ron_string().unwrap();
        assert_eq!(Config::from_ron_str(&ron).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_ron_str("(pretty_export: true)").unwrap();
        assert!(config.pretty_export);
        assert_eq!(config.alphabet, alphabet::default_alphabet());
        assert_eq!(config.export_file_name, "tmpStrokeStorage.json");
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_disk(&dir.path().join("config.ron"));
        assert_eq!(config, Config::default());
        assert!(!config.had_error_parsing());
    }

    #[test]
    fn broken_file_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        std::fs::write(&path, "(alphabet: [").unwrap();

        let config = Config::from_disk(&path);
        assert!(config.had_error_parsing());
        config.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "(alphabet: [");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let config = Config {
            alphabet: vec![String::from("x"), String::from("y")],
            start_label: String::from("y"),
            ..Config::new()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::from_disk(&path), config);
    }

    #[test]
    fn start_label_falls_back() {
        let config = Config::with_alphabet(vec![String::from("α"), String::from("β")]);
        assert_eq!(config.start_label(), "α");
        assert_eq!(Config::new().start_label(), "a");
    }
}
