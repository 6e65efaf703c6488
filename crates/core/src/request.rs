//! Validated request types entering the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::preset::Preset;

/// Effect used when a client does not name one.
pub const DEFAULT_EFFECT: &str = "echo";

/// Names of the four control values, in argument order.
pub const CONTROL_NAMES: [&str; 4] = ["pot1", "pot2", "pot3", "pot4"];

/// Errors raised while validating an upload request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestError {
    /// File extension is not in the allow-list.
    #[error("Invalid file type. Allowed: {allowed}")]
    InvalidFileType { extension: String, allowed: String },

    /// A control value is malformed or outside `[0.0, 1.0]`.
    #[error("Parameter {name} must be between 0.0 and 1.0 (got {value})")]
    InvalidParameter { name: String, value: String },

    /// Named preset does not exist.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

impl RequestError {
    fn invalid_parameter(name: &str, value: impl fmt::Display) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Audio container/codec types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
}

impl AudioFormat {
    /// Every accepted format, in probe order.
    pub const ALL: [AudioFormat; 4] = [Self::Mp3, Self::Wav, Self::Ogg, Self::M4a];

    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
        }
    }

    /// MIME type used when streaming the file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Ogg => "audio/ogg",
            Self::M4a => "audio/mp4",
        }
    }

    /// Parses an extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    /// Determines the format from a client supplied file name.
    ///
    /// Only the part after the last dot counts; names without a dot are rejected.
    pub fn from_file_name(file_name: &str) -> Result<Self, RequestError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();

        Self::from_extension(extension).ok_or_else(|| RequestError::InvalidFileType {
            extension: extension.to_ascii_lowercase(),
            allowed: Self::allowed_list(),
        })
    }

    /// Comma separated list of accepted extensions.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// The four normalized control values handed to the effect program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub pot1: f64,
    pub pot2: f64,
    pub pot3: f64,
    pub pot4: f64,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            pot1: 0.3,
            pot2: 0.0,
            pot3: 0.0,
            pot4: 0.5,
        }
    }
}

impl Controls {
    pub const fn new(pot1: f64, pot2: f64, pot3: f64, pot4: f64) -> Self {
        Self {
            pot1,
            pot2,
            pot3,
            pot4,
        }
    }

    /// Values in argument order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.pot1, self.pot2, self.pot3, self.pot4]
    }

    /// Checks every value lies in `[0.0, 1.0]`. NaN is rejected.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in CONTROL_NAMES.iter().zip(self.as_array()) {
            if !(0.0..=1.0).contains(&value) {
                return Err(RequestError::invalid_parameter(name, value));
            }
        }
        Ok(())
    }

    /// Values formatted as the decimal strings passed on the command line.
    pub fn to_args(&self) -> Vec<String> {
        self.as_array().iter().map(|v| format_decimal(*v)).collect()
    }
}

/// Formats a value as a plain decimal, always carrying a fractional part.
fn format_decimal(value: f64) -> String {
    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{}.0", s)
    }
}

/// A validated effect invocation: opaque effect name plus control values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub effect: String,
    pub controls: Controls,
}

impl EffectRequest {
    /// Builds a request, rejecting out-of-range control values.
    pub fn new(effect: impl Into<String>, controls: Controls) -> Result<Self, RequestError> {
        let request = Self {
            effect: effect.into(),
            controls,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        self.controls.validate()
    }

    /// Process arguments in fixed order: effect, pot1, pot2, pot3, pot4.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(5);
        args.push(self.effect.clone());
        args.extend(self.controls.to_args());
        args
    }
}

/// Loosely typed form fields as they arrive from a client.
///
/// Empty strings count as absent. Explicit control values override the
/// preset's, which override the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct EffectForm {
    pub effect: Option<String>,
    pub preset: Option<String>,
    pub pots: [Option<String>; 4],
}

impl EffectForm {
    /// Records a form field by name. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let value = Some(value).filter(|v| !v.trim().is_empty());
        match name {
            "effect" => self.effect = value,
            "preset" => self.preset = value,
            other => {
                if let Some(index) = CONTROL_NAMES.iter().position(|n| *n == other) {
                    self.pots[index] = value;
                }
            }
        }
    }

    /// Converts the form into a validated request.
    pub fn into_request(
        self,
        default_effect: &str,
        lookup: impl Fn(&str) -> Option<&'static Preset>,
    ) -> Result<EffectRequest, RequestError> {
        let base = match self.preset.as_deref() {
            Some(name) => {
                lookup(name)
                    .ok_or_else(|| RequestError::UnknownPreset(name.to_string()))?
                    .controls
            }
            None => Controls::default(),
        };

        let mut values = base.as_array();
        for (index, raw) in self.pots.iter().enumerate() {
            if let Some(raw) = raw {
                values[index] = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| RequestError::invalid_parameter(CONTROL_NAMES[index], raw))?;
            }
        }

        let effect = self
            .effect
            .unwrap_or_else(|| default_effect.to_string());
        EffectRequest::new(
            effect,
            Controls::new(values[0], values[1], values[2], values[3]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetCatalog;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(AudioFormat::from_file_name("riff.mp3"), Ok(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_file_name("Take 2.WAV"), Ok(AudioFormat::Wav));
        assert_eq!(AudioFormat::from_file_name("a.b.ogg"), Ok(AudioFormat::Ogg));
        assert_eq!(AudioFormat::from_file_name("voice.m4a"), Ok(AudioFormat::M4a));
    }

    #[test]
    fn test_format_rejects_unknown_extensions() {
        let err = AudioFormat::from_file_name("song.flac").unwrap_err();
        assert!(matches!(err, RequestError::InvalidFileType { ref extension, .. } if extension == "flac"));
        assert_eq!(
            err.to_string(),
            "Invalid file type. Allowed: mp3, wav, ogg, m4a"
        );
        assert!(AudioFormat::from_file_name("mp3").is_err());
        assert!(AudioFormat::from_file_name("").is_err());
    }

    #[test]
    fn test_controls_validation() {
        assert!(Controls::new(0.0, 1.0, 0.5, 0.25).validate().is_ok());

        let err = Controls::new(1.5, 0.0, 0.0, 0.0).validate().unwrap_err();
        assert_eq!(
            err,
            RequestError::InvalidParameter {
                name: "pot1".to_string(),
                value: "1.5".to_string()
            }
        );

        let err = Controls::new(0.0, 0.0, 0.0, -0.1).validate().unwrap_err();
        assert!(matches!(err, RequestError::InvalidParameter { ref name, .. } if name == "pot4"));

        assert!(Controls::new(f64::NAN, 0.0, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_args_order_and_format() {
        let request = EffectRequest::new("echo", Controls::new(0.3, 0.0, 1.0, 0.25)).unwrap();
        assert_eq!(
            request.to_args(),
            vec!["echo", "0.3", "0.0", "1.0", "0.25"]
        );
    }

    #[test]
    fn test_form_defaults() {
        let request = EffectForm::default()
            .into_request(DEFAULT_EFFECT, PresetCatalog::get)
            .unwrap();
        assert_eq!(request.effect, "echo");
        assert_eq!(request.controls, Controls::default());
    }

    #[test]
    fn test_form_preset_then_overrides() {
        let mut form = EffectForm::default();
        form.set("preset", "ambient".to_string());
        form.set("pot2", "0.9".to_string());
        form.set("effect", "flanger".to_string());
        form.set("unrelated", "x".to_string());

        let request = form.into_request(DEFAULT_EFFECT, PresetCatalog::get).unwrap();
        assert_eq!(request.effect, "flanger");
        assert_eq!(request.controls, Controls::new(0.5, 0.9, 0.2, 0.7));
    }

    #[test]
    fn test_form_rejects_bad_values() {
        let mut form = EffectForm::default();
        form.set("pot3", "loud".to_string());
        let err = form
            .into_request(DEFAULT_EFFECT, PresetCatalog::get)
            .unwrap_err();
        assert!(matches!(err, RequestError::InvalidParameter { ref name, .. } if name == "pot3"));

        let mut form = EffectForm::default();
        form.set("preset", "nope".to_string());
        assert_eq!(
            form.into_request(DEFAULT_EFFECT, PresetCatalog::get),
            Err(RequestError::UnknownPreset("nope".to_string()))
        );
    }

    #[test]
    fn test_form_empty_values_fall_back() {
        let mut form = EffectForm::default();
        form.set("effect", "".to_string());
        form.set("pot1", "  ".to_string());
        let request = form.into_request("chorus", PresetCatalog::get).unwrap();
        assert_eq!(request.effect, "chorus");
        assert_eq!(request.controls.pot1, 0.3);
    }
}
