/*!
 * End-to-end tests for the subtitle cleanup workflow
 */

use std::fs;
use anyhow::Result;
use subpolish::app_config::InputFormat;
use subpolish::app_controller::Controller;
use crate::common;

const UNTRANSLATED_TEXT: &str = "1
00:00:01,000 --> 00:00:02,000
Hi Happy
快乐Happy Hogan来了

2
00:00:03,000 --> 00:00:04,000
Ok
Tony和Pepper
";

/// Test the full subtitle workflow with a name dictionary
#[test]
fn test_run_withSubtitleAndDictionary_shouldWriteCleanBilingualFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;
    let input = common::create_test_subtitle(temp_dir.path(), "episode.srt")?;
    let output_dir = temp_dir.path().join("out");

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Subtitle))?;
    let written = controller.run(&input, &output_dir, false)?;

    let output_path = written.expect("output should be written");
    assert_eq!(output_path, output_dir.join("episode.clean.srt"));

    let output = fs::read_to_string(&output_path)?;
    assert_eq!(output.matches("\r\n\r\n").count(), 3);
    assert!(output.starts_with("1\r\n00:00:01,000 --> 00:00:03,000\r\n"));

    // Punctuation normalized in the source-language line
    assert!(output.contains("Tony Stark, is here!"));
    // Names translated in the target-language lines only
    assert!(output.contains("托尼·斯塔克在这里!"));
    assert!(output.contains("- 托尼在哪?  - 楼上."));
    assert!(output.contains("# 斯塔克是谁 #"));
    assert!(!output.contains("Tony在哪"));

    Ok(())
}

/// Test the caption workflow drops boilerplate records
#[test]
fn test_run_withCaptionFormat_shouldDropBoilerplateRecords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "show.txt", common::CAPTION_TEXT)?;

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Caption))?;
    let output_path = controller
        .run(&input, temp_dir.path(), false)?
        .expect("output should be written");
    assert_eq!(output_path.file_name().unwrap(), "show.clean.txt");

    let output = fs::read_to_string(&output_path)?;
    assert_eq!(output.matches("\r\n\r\n").count(), 2);
    assert!(output.contains("Previously on the show..."));
    assert!(output.contains("# la la la #"));
    assert!(!output.contains("<i>"));
    assert!(!output.contains("Captioning"));
    assert!(!output.contains("door slams"));

    Ok(())
}

/// Test in-memory processing without a dictionary
#[test]
fn test_process_text_withoutDictionary_shouldKeepNames() -> Result<()> {
    let controller = Controller::with_config(Default::default())?;

    let output = controller.process_text(common::SUBTITLE_TEXT, None)?;

    assert!(output.contains("- Tony在哪?  - 楼上."));
    assert!(output.contains("# Stark是谁 #"));
    Ok(())
}

/// Test processing a folder of subtitles
#[test]
fn test_run_folder_withMixedFiles_shouldProcessSupportedOnes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;
    let season = temp_dir.path().join("season1");
    fs::create_dir_all(&season)?;
    common::create_test_subtitle(&season, "e01.srt")?;
    common::create_test_subtitle(&season, "e02.srt")?;
    common::create_test_file(&season, "notes.md", "not a subtitle")?;

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Subtitle))?;

    assert_eq!(controller.run_folder(&season, false)?, 2);
    assert!(season.join("e01.clean.srt").is_file());
    assert!(season.join("e02.clean.srt").is_file());

    // Existing outputs are skipped, and outputs are never re-processed
    assert_eq!(controller.run_folder(&season, false)?, 0);
    assert_eq!(controller.run_folder(&season, true)?, 2);
    assert!(!season.join("e01.clean.clean.srt").exists());

    Ok(())
}

/// Test that one bad file does not stop a folder run
#[test]
fn test_run_folder_withMalformedFile_shouldContinue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "good.srt")?;
    common::create_test_file(temp_dir.path(), "bad.srt", "1\nts\nA\nB\nC\n")?;

    let controller = Controller::with_config(Default::default())?;

    assert_eq!(controller.run_folder(temp_dir.path(), false)?, 1);
    assert!(temp_dir.path().join("good.clean.srt").is_file());
    assert!(!temp_dir.path().join("bad.clean.srt").exists());
    Ok(())
}

/// Test name discovery after known names are translated
#[test]
fn test_discover_names_withPartiallyKnownNames_shouldReportUnknownOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;
    let input = common::create_test_file(temp_dir.path(), "names.srt", UNTRANSLATED_TEXT)?;

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Subtitle))?;
    let names = controller.discover_names(&input)?;

    assert_eq!(names, vec!["Happy Hogan".to_string()]);
    Ok(())
}

/// Test appending stubs for names missing from the dictionary
#[test]
fn test_append_name_stubs_withKnownAndUnknownNames_shouldAppendUnknownOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Subtitle))?;
    let written = controller.append_name_stubs(&["Happy Hogan".to_string(), "Jarvis".to_string()])?;

    assert_eq!(written, 1);
    let content = fs::read_to_string(&dictionary)?;
    assert!(content.starts_with(common::DICTIONARY_TEXT));
    assert!(content.ends_with("Happy Hogan = \n"));
    Ok(())
}

/// Test that repeated appends do not duplicate pending stubs
#[test]
fn test_append_name_stubs_calledTwice_shouldWriteEachStubOnce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dictionary = common::create_test_dictionary(temp_dir.path())?;

    let controller = Controller::with_config(common::config_with_dictionary(&dictionary, InputFormat::Subtitle))?;
    let names = vec!["Happy Hogan".to_string(), "Rhodey".to_string(), "Rhodey".to_string()];

    assert_eq!(controller.append_name_stubs(&names)?, 2);
    assert_eq!(controller.append_name_stubs(&names)?, 0);

    let content = fs::read_to_string(&dictionary)?;
    assert_eq!(content.matches("Happy Hogan = ").count(), 1);
    assert_eq!(content.matches("Rhodey = ").count(), 1);
    Ok(())
}
