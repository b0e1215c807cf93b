//! Engine argument construction for trim requests

use crate::domain::model::{ProcessingRequest, QualityProfile};
use crate::engine::BufferNames;
use crate::utils::time::TimeCodec;

/// Audio codec paired with any re-encoded video
pub const REENCODE_AUDIO_CODEC: &str = "aac";

/// Builds the ordered engine argument list for a processing request
///
/// The output is a pure function of the request and the buffer names, so
/// equal requests always produce identical argument lists.
#[derive(Debug, Clone, Default)]
pub struct ArgumentBuilder {
    names: BufferNames,
}

impl ArgumentBuilder {
    pub fn new(names: BufferNames) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &BufferNames {
        &self.names
    }

    /// Build the full argument list
    pub fn build(&self, request: &ProcessingRequest) -> Vec<String> {
        let mut args = Vec::with_capacity(14);

        args.push("-i".to_string());
        args.push(self.names.input());

        args.push("-ss".to_string());
        args.push(TimeCodec::format(request.marks.start_seconds));
        args.push("-to".to_string());
        args.push(TimeCodec::format(request.marks.end_seconds));

        Self::push_video_clause(&mut args, &request.quality);
        Self::push_audio_clause(&mut args, request.muted, &request.quality);

        args.push(self.names.output(request.mode));
        args
    }

    fn push_video_clause(args: &mut Vec<String>, quality: &QualityProfile) {
        if quality.is_stream_copy() {
            args.push("-c:v".to_string());
            args.push("copy".to_string());
        } else {
            args.push("-vf".to_string());
            args.push(format!(
                "scale={}:{}",
                quality.target_width, quality.target_height
            ));
            args.push("-b:v".to_string());
            args.push(quality.bitrate.to_string());
        }
    }

    // Copying audio next to re-encoded video is rejected by most muxers, so a
    // re-encode always names a concrete audio codec.
    fn push_audio_clause(args: &mut Vec<String>, muted: bool, quality: &QualityProfile) {
        if muted {
            args.push("-an".to_string());
        } else if !quality.is_stream_copy() {
            args.push("-c:a".to_string());
            args.push(REENCODE_AUDIO_CODEC.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProcessingMode, TrimMarks, QUALITY_PROFILES};

    fn request(start: f64, end: f64, muted: bool, quality: QualityProfile, mode: ProcessingMode) -> ProcessingRequest {
        ProcessingRequest {
            marks: TrimMarks::new(start, end, 600.0).unwrap(),
            muted,
            quality,
            mode,
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_muted_stream_copy_final() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&request(
            5.0,
            10.0,
            true,
            QualityProfile::ORIGINAL,
            ProcessingMode::Final,
        ));
        assert_eq!(
            args,
            strings(&[
                "-i", "input.mp4", "-ss", "00:00:05", "-to", "00:00:10", "-c:v", "copy", "-an",
                "output.mp4",
            ])
        );
    }

    #[test]
    fn test_unmuted_stream_copy_omits_audio_clause() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&request(
            0.0,
            61.7,
            false,
            QualityProfile::ORIGINAL,
            ProcessingMode::Preview,
        ));
        assert_eq!(
            args,
            strings(&[
                "-i", "input.mp4", "-ss", "00:00:00", "-to", "00:01:01", "-c:v", "copy",
                "preview.mp4",
            ])
        );
    }

    #[test]
    fn test_reencode_pairs_audio_codec() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&request(
            3600.0,
            3725.0,
            false,
            QUALITY_PROFILES[2],
            ProcessingMode::Final,
        ));
        assert_eq!(
            args,
            strings(&[
                "-i",
                "input.mp4",
                "-ss",
                "01:00:00",
                "-to",
                "01:02:05",
                "-vf",
                "scale=1280:720",
                "-b:v",
                "1M",
                "-c:a",
                "aac",
                "output.mp4",
            ])
        );
    }

    #[test]
    fn test_muted_reencode_strips_audio() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&request(1.0, 2.0, true, QUALITY_PROFILES[3], ProcessingMode::Preview));
        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
        assert!(args.contains(&"800k".to_string()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = ArgumentBuilder::default();
        for quality in QUALITY_PROFILES {
            for muted in [false, true] {
                let req = request(12.0, 48.0, muted, quality, ProcessingMode::Preview);
                assert_eq!(builder.build(&req), builder.build(&req.clone()));
            }
        }
    }

    #[test]
    fn test_start_precedes_end() {
        let builder = ArgumentBuilder::default();
        let args = builder.build(&request(7.0, 9.0, false, QualityProfile::ORIGINAL, ProcessingMode::Final));
        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let to = args.iter().position(|a| a == "-to").unwrap();
        assert!(ss < to);
        assert_eq!(&args[0..2], &strings(&["-i", "input.mp4"])[..]);
    }

    #[test]
    fn test_custom_container_extension() {
        let builder = ArgumentBuilder::new(BufferNames::new("mov", "jpg"));
        let args = builder.build(&request(1.0, 2.0, false, QualityProfile::ORIGINAL, ProcessingMode::Preview));
        assert_eq!(args[1], "input.mov");
        assert_eq!(args.last().unwrap(), "preview.mov");
    }
}
