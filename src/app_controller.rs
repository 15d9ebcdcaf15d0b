use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::{Config, InputFormat};
use crate::errors::{AppError, DictionaryError};
use crate::file_utils::FileManager;
use crate::name_dictionary::{NameDictionary, OrganizedNameDictionary};
use crate::subtitle_processor::SubtitleList;

// @module: Application controller for subtitle processing

// @const: Extensions picked up when processing a folder
const SUPPORTED_EXTENSIONS: [&str; 2] = ["srt", "txt"];

/// Main application controller for subtitle cleanup
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the raw name dictionary, if one is configured
    pub fn load_dictionary(&self) -> Result<Option<NameDictionary>> {
        let Some(path) = &self.config.dictionary_path else {
            return Ok(None);
        };

        let content = Self::read_dictionary_source(path)?;
        let dictionary = NameDictionary::parse(&content);
        if dictionary.is_empty() {
            warn!("Name dictionary {} has no usable entries", path);
        } else {
            info!("Loaded {} names from {}", dictionary.len(), path);
        }

        Ok(Some(dictionary))
    }

    // @returns: Raw dictionary file content
    fn read_dictionary_source(path: &str) -> Result<String, AppError> {
        FileManager::read_to_string(path).map_err(|e| {
            AppError::from(DictionaryError::Unreadable {
                path: path.to_string(),
                message: format!("{:#}", e),
            })
        })
    }

    // @returns: Organized dictionary when name translation is enabled
    fn load_organized_dictionary(&self) -> Result<Option<OrganizedNameDictionary>> {
        if !self.config.processing.translate_names {
            return Ok(None);
        }

        Ok(self.load_dictionary()?.map(|dictionary| {
            let organized = dictionary.organize();
            debug!(
                "Organized dictionary: {} full names, {} partial names",
                organized.full_names().len(),
                organized.partial_names().len()
            );
            organized
        }))
    }

    /// Parse text in the configured input format and run the cleanup passes
    pub fn build_list(&self, text: &str, dictionary: Option<&OrganizedNameDictionary>) -> Result<SubtitleList> {
        let mut list = match self.config.input_format {
            InputFormat::Subtitle => SubtitleList::from_subtitle_text(text)
                .map_err(AppError::from)
                .context("Failed to parse subtitle text")?,
            InputFormat::Caption => SubtitleList::from_caption_text(text).clean_captions(),
        };

        if self.config.processing.reformat {
            list = list.reformat();
        }

        if let Some(dictionary) = dictionary {
            list = list
                .translate_names(dictionary, &self.config.processing.translation_separator)
                .map_err(AppError::from)
                .context("Name translation failed")?;
        }

        Ok(list)
    }

    /// Process text and serialize the result
    pub fn process_text(&self, text: &str, dictionary: Option<&OrganizedNameDictionary>) -> Result<String> {
        Ok(self.build_list(text, dictionary)?.serialize())
    }

    /// Process one file into `output_dir`.
    ///
    /// Returns the written path, or `None` when the output already exists and
    /// `force_overwrite` is off.
    pub fn run(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let dictionary = self.load_organized_dictionary()?;
        self.run_with_dictionary(input_file, output_dir, force_overwrite, dictionary.as_ref())
    }

    fn run_with_dictionary(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
        dictionary: Option<&OrganizedNameDictionary>,
    ) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)).into());
        }

        let extension = input_file
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .unwrap_or_else(|| "srt".to_string());
        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.processing.output_suffix,
            &extension,
        );

        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", input_file);
            return Ok(None);
        }

        let content = FileManager::read_to_string(input_file)?;
        let output = self
            .process_text(&content, dictionary)
            .with_context(|| format!("Failed to process {:?}", input_file))?;

        FileManager::write_to_file(&output_path, &output)?;

        info!(
            "Wrote {:?} in {:.2}s",
            output_path,
            start_time.elapsed().as_secs_f64()
        );
        Ok(Some(output_path))
    }

    /// Process every supported file under `input_dir`, writing next to each input.
    ///
    /// A file that fails is logged and skipped. Returns the number of files written.
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<usize> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)).into());
        }

        let dictionary = self.load_organized_dictionary()?;
        let own_suffix = format!(".{}", self.config.processing.output_suffix);

        let mut inputs = Vec::new();
        for extension in SUPPORTED_EXTENSIONS {
            inputs.extend(FileManager::find_files(input_dir, extension)?);
        }
        inputs.retain(|path| {
            !path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().ends_with(&own_suffix))
        });

        info!("Found {} subtitle file(s) in {:?}", inputs.len(), input_dir);

        let mut processed = 0;
        let mut failed = 0;
        for input in &inputs {
            let output_dir = input.parent().unwrap_or(Path::new("."));
            match self.run_with_dictionary(input, output_dir, force_overwrite, dictionary.as_ref()) {
                Ok(Some(_)) => processed += 1,
                Ok(None) => {}
                Err(e) => {
                    error!("Error processing {:?}: {:#}", input, e);
                    failed += 1;
                }
            }
        }

        info!("Finished: {} written, {} failed", processed, failed);
        Ok(processed)
    }

    /// List names still untranslated in the target-language lines of a file.
    ///
    /// Known dictionary names are translated first, so only names the
    /// dictionary cannot handle yet are reported.
    pub fn discover_names(&self, input_file: &Path) -> Result<Vec<String>> {
        let dictionary = self.load_organized_dictionary()?;
        let content = FileManager::read_to_string(input_file)?;
        let list = self.build_list(&content, dictionary.as_ref())?;

        let names = list.discover_names();
        debug!("Discovered {} candidate names in {:?}", names.len(), input_file);
        Ok(names)
    }

    /// Append `name = ` stubs to the configured dictionary for names it lacks.
    ///
    /// Names already mapped, or already waiting as a stub, are skipped.
    /// Returns the number of stubs written.
    pub fn append_name_stubs(&self, names: &[String]) -> Result<usize> {
        let path = self
            .config
            .dictionary_path
            .as_ref()
            .ok_or_else(|| AppError::Config("No name dictionary configured".to_string()))?;

        let content = Self::read_dictionary_source(path)?;
        let existing = NameDictionary::parse(&content);
        let mut known = NameDictionary::parse_stubs(&content);

        let stubs: Vec<String> = names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty() && !existing.contains(name))
            .filter(|name| known.insert(name.to_string()))
            .map(|name| format!("{} = ", name))
            .collect();

        FileManager::append_lines(path, &stubs)?;
        info!("Appended {} name stub(s) to {}", stubs.len(), path);
        Ok(stubs.len())
    }
}
