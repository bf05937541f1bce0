use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use crate::app::Studio;
use crate::config::{self, AppConfig};
use crate::editor::{CropRatio, EditorEvent, EditorMode, EditorSession, SourceImage};
use crate::error::{AppError, AppResult};
use crate::generation::{
    CastMember, GeminiBackend, GenerationKind, GenerationRequest, ImageAspectRatio, ImageRequest,
    PromptSpec, ResolutionTier, VideoAspectRatio, VideoRequest, VideoResolution,
};
use crate::geometry::Point;
use crate::history::{HistoryRecord, HistoryStore};
use crate::media::{self, MediaLocator};

const URL_PREVIEW_CHARS: usize = 48;

#[derive(Parser, Debug)]
#[command(name = "dreamframe")]
#[command(about = "Generate images and videos, keep a local history, and edit the results")]
#[command(version)]
pub struct Cli {
    /// History file (defaults to the configured or XDG data location)
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Adjust and crop an image from history or from a file/URL
    Edit(EditArgs),
    /// Ask the generation service for new media
    #[command(subcommand)]
    Generate(GenerateCommand),
    /// Inspect or prune the history
    #[command(subcommand)]
    History(HistoryCommand),
}

#[derive(Args, Debug)]
struct EditArgs {
    /// History record id, file path, data URI or http(s) URL
    target: String,

    #[arg(long, default_value_t = 100)]
    brightness: i32,
    #[arg(long, default_value_t = 100)]
    contrast: i32,
    #[arg(long, default_value_t = 100)]
    saturation: i32,

    /// Crop ratio: Original, 1:1, 16:9 or 4:3
    #[arg(long, default_value = "Original", value_parser = parse_crop_ratio)]
    ratio: CropRatio,

    /// Zoom factor, clamped to [0.5, 3.0]
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_x: f64,
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pan_y: f64,

    /// Write the edited PNG here
    #[arg(short, long, required_unless_present = "save_to_history")]
    output: Option<PathBuf>,

    /// Add the edit to history as a new record (history targets only)
    #[arg(long)]
    save_to_history: bool,
}

impl EditArgs {
    /// Controls replayed in the order a person would use them: the ratio
    /// first since selecting it resets zoom and pan.
    fn events(&self) -> Vec<EditorEvent> {
        let mut events = vec![
            EditorEvent::SetCropRatio(self.ratio),
            EditorEvent::brightness(self.brightness),
            EditorEvent::contrast(self.contrast),
            EditorEvent::saturation(self.saturation),
            EditorEvent::SetZoom(self.zoom),
        ];
        if self.pan_x != 0.0 || self.pan_y != 0.0 {
            events.extend([
                EditorEvent::SelectMode(EditorMode::Crop),
                EditorEvent::PointerDown(Point::ORIGIN),
                EditorEvent::PointerMove(Point::new(self.pan_x, self.pan_y)),
                EditorEvent::PointerUp,
            ]);
        }
        events
    }
}

#[derive(Subcommand, Debug)]
enum GenerateCommand {
    /// Generate an image
    Image(ImageArgs),
    /// Generate a short video (polls until the service finishes)
    Video(VideoArgs),
}

#[derive(Args, Debug)]
struct ImageArgs {
    prompt: String,

    /// 1:1, 16:9, 9:16, 4:3 or 3:4
    #[arg(long, default_value = "1:1", value_parser = parse_image_aspect)]
    aspect: ImageAspectRatio,

    /// 1K, 2K or 4K
    #[arg(long, default_value = "1K", value_parser = parse_resolution_tier)]
    resolution: ResolutionTier,

    /// Generation kind id, e.g. DEFAULT, LOGO, ANIMATION_STORY
    #[arg(long, default_value = "DEFAULT", value_parser = parse_kind)]
    kind: GenerationKind,

    /// Art style, e.g. Watercolor
    #[arg(long)]
    style: Option<String>,

    /// Story cast member as name=description (repeatable)
    #[arg(long = "cast", value_parser = parse_cast_member)]
    cast: Vec<CastMember>,
}

#[derive(Args, Debug)]
struct VideoArgs {
    prompt: String,

    /// 16:9 or 9:16
    #[arg(long, default_value = "16:9", value_parser = parse_video_aspect)]
    aspect: VideoAspectRatio,

    /// 720p or 1080p
    #[arg(long, default_value = "720p", value_parser = parse_video_resolution)]
    resolution: VideoResolution,
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List records, newest first
    List,
    /// Delete one record
    Delete { id: String },
    /// Delete every record
    Clear,
}

fn parse_crop_ratio(value: &str) -> Result<CropRatio, String> {
    CropRatio::from_label(value).ok_or_else(|| {
        let labels: Vec<_> = CropRatio::ALL.iter().map(|ratio| ratio.label()).collect();
        format!("expected one of {}", labels.join(", "))
    })
}

fn parse_image_aspect(value: &str) -> Result<ImageAspectRatio, String> {
    ImageAspectRatio::parse(value).ok_or_else(|| "expected 1:1, 16:9, 9:16, 4:3 or 3:4".into())
}

fn parse_resolution_tier(value: &str) -> Result<ResolutionTier, String> {
    ResolutionTier::parse(value).ok_or_else(|| "expected 1K, 2K or 4K".into())
}

fn parse_kind(value: &str) -> Result<GenerationKind, String> {
    GenerationKind::from_id(value).ok_or_else(|| {
        let ids: Vec<_> = GenerationKind::ALL.iter().map(|kind| kind.id()).collect();
        format!("expected one of {}", ids.join(", "))
    })
}

fn parse_video_aspect(value: &str) -> Result<VideoAspectRatio, String> {
    VideoAspectRatio::parse(value).ok_or_else(|| "expected 16:9 or 9:16".into())
}

fn parse_video_resolution(value: &str) -> Result<VideoResolution, String> {
    VideoResolution::parse(value).ok_or_else(|| "expected 720p or 1080p".into())
}

fn parse_cast_member(value: &str) -> Result<CastMember, String> {
    let (name, description) = value
        .split_once('=')
        .ok_or_else(|| "expected name=description".to_string())?;
    let name = name.trim();
    if name.is_empty() {
        return Err("cast member needs a name".into());
    }
    Ok(CastMember::new(name, description.trim()))
}

pub fn execute(cli: Cli) -> AppResult<()> {
    let config = config::load_app_config();
    let history_path = match cli.history {
        Some(path) => path,
        None => config.history_path()?,
    };
    let mut studio = Studio::new(HistoryStore::open(history_path));

    match cli.command {
        Command::Edit(args) => edit(&mut studio, &args),
        Command::Generate(command) => generate(&mut studio, &config, command),
        Command::History(HistoryCommand::List) => {
            for record in studio.history().records() {
                println!("{}", describe(record));
            }
            Ok(())
        }
        Command::History(HistoryCommand::Delete { id }) => {
            let removed = studio.delete(&id)?;
            println!("deleted {}", removed.id);
            Ok(())
        }
        Command::History(HistoryCommand::Clear) => {
            let count = studio.history().len();
            studio.clear()?;
            println!("cleared {count} records");
            Ok(())
        }
    }
}

fn edit(studio: &mut Studio, args: &EditArgs) -> AppResult<()> {
    let record_url = studio.history().get(&args.target).map(|r| r.url.clone());

    if args.save_to_history {
        if record_url.is_none() {
            return Err(AppError::UnknownRecord {
                id: args.target.clone(),
            });
        }
        let mut session = studio.begin_edit(&args.target)?;
        apply(&mut session, args);
        let saved = studio.commit_edit(session)?;
        if let Some(output) = &args.output {
            std::fs::write(output, &saved.image.png)?;
        }
        println!("{}", describe(&saved.record));
        return Ok(());
    }

    let locator = MediaLocator::parse(record_url.as_deref().unwrap_or(&args.target))?;
    let bitmap = media::load_source_image(&locator)?;
    let mut session = EditorSession::open(SourceImage::ready(bitmap));
    apply(&mut session, args);
    let edited = session.save()?;
    if let Some(output) = &args.output {
        std::fs::write(output, &edited.png)?;
        println!(
            "wrote {}x{} PNG to {}",
            edited.width,
            edited.height,
            output.display()
        );
    }
    Ok(())
}

fn apply(session: &mut EditorSession, args: &EditArgs) {
    for event in args.events() {
        session.dispatch(event);
    }
    let state = session.state();
    tracing::debug!(
        ratio = %state.crop_ratio,
        zoom = state.zoom.value(),
        pan_x = state.pan.x,
        pan_y = state.pan.y,
        recomposites = session.recomposite_count(),
        "edit applied"
    );
}

fn generate(studio: &mut Studio, config: &AppConfig, command: GenerateCommand) -> AppResult<()> {
    let (request, display_prompt) = match command {
        GenerateCommand::Image(args) => {
            let composed = PromptSpec {
                prompt: args.prompt,
                kind: args.kind,
                style: args.style,
                cast: args.cast,
            }
            .compose();
            let request = GenerationRequest::Image(ImageRequest {
                prompt: composed.final_prompt,
                aspect_ratio: args.aspect,
                resolution: args.resolution,
            });
            (request, composed.display_prompt)
        }
        GenerateCommand::Video(args) => {
            let display_prompt = args.prompt.clone();
            let request = GenerationRequest::Video(VideoRequest {
                prompt: args.prompt,
                aspect_ratio: args.aspect,
                resolution: args.resolution,
            });
            (request, display_prompt)
        }
    };
    request.validate()?;

    let api_key = config::api_key_from_env()?;
    let backend = Arc::new(GeminiBackend::from_config(config, api_key)?);
    let media = request.media_type();
    let record = studio
        .generate(backend, request, &display_prompt)
        .map_err(|err| err.for_media(media))?;
    println!("{}", describe(&record));
    Ok(())
}

fn describe(record: &HistoryRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        record.id,
        record.media_type.label(),
        record.aspect_ratio,
        record.timestamp_millis,
        record.prompt,
        preview_url(&record.url)
    )
}

fn preview_url(url: &str) -> String {
    if url.chars().count() <= URL_PREVIEW_CHARS {
        return url.to_string();
    }
    let head: String = url.chars().take(URL_PREVIEW_CHARS).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    #[test]
    fn edit_arguments_parse_into_ordered_events() {
        let cli = Cli::try_parse_from([
            "dreamframe",
            "edit",
            "photo.png",
            "--ratio",
            "16:9",
            "--zoom",
            "2",
            "--pan-x",
            "-30",
            "--pan-y",
            "12.5",
            "-o",
            "out.png",
        ])
        .unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.ratio, CropRatio::Wide16x9);

        let mut session = EditorSession::open(SourceImage::ready(image::RgbaImage::new(64, 64)));
        apply(&mut session, &args);
        let state = session.state();
        assert_eq!(state.crop_ratio, CropRatio::Wide16x9);
        assert_eq!(state.zoom.value(), 2.0);
        assert_eq!((state.pan.x, state.pan.y), (-30.0, 12.5));
        assert!(!state.is_dragging());
        assert_eq!(state.target_dimensions(), Size::new(64.0, 36.0));
    }

    #[test]
    fn edit_requires_an_output_or_history() {
        assert!(Cli::try_parse_from(["dreamframe", "edit", "photo.png"]).is_err());
        assert!(
            Cli::try_parse_from(["dreamframe", "edit", "item-1", "--save-to-history"]).is_ok()
        );
    }

    #[test]
    fn generate_image_arguments_parse() {
        let cli = Cli::try_parse_from([
            "dreamframe",
            "generate",
            "image",
            "two friends at sea",
            "--kind",
            "animation_story",
            "--aspect",
            "9:16",
            "--resolution",
            "2k",
            "--cast",
            "Mira=red scarf",
            "--cast",
            "Tob = tall, bearded",
        ])
        .unwrap();
        let Command::Generate(GenerateCommand::Image(args)) = cli.command else {
            panic!("expected generate image");
        };
        assert_eq!(args.kind, GenerationKind::AnimationStory);
        assert_eq!(args.aspect, ImageAspectRatio::Portrait);
        assert_eq!(args.resolution, ResolutionTier::TwoK);
        assert_eq!(
            args.cast,
            vec![
                CastMember::new("Mira", "red scarf"),
                CastMember::new("Tob", "tall, bearded")
            ]
        );
    }

    #[test]
    fn bad_option_values_are_rejected() {
        assert!(Cli::try_parse_from(["dreamframe", "edit", "x", "-o", "y", "--ratio", "3:2"])
            .is_err());
        assert!(
            Cli::try_parse_from(["dreamframe", "generate", "video", "p", "--aspect", "1:1"])
                .is_err()
        );
        assert!(parse_cast_member("no separator").is_err());
        assert!(parse_cast_member("=nameless").is_err());
    }

    #[test]
    fn long_urls_are_shortened_for_listing() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(200));
        let shown = preview_url(&uri);
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), URL_PREVIEW_CHARS + 3);
        assert_eq!(preview_url("/tmp/a.png"), "/tmp/a.png");
    }
}
