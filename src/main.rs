use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gradeflow_avatar::application::services::placeholder_for;
use gradeflow_avatar::application::{
    AvatarEditor, AvatarImageLoader, LoginRequest, LoginUseCase, ResolveTokenUseCase, ToastQueue,
};
use gradeflow_avatar::domain::entities::{AvatarFile, LoadOutcome};
use gradeflow_avatar::domain::ports::{AvatarApi, NotificationPort};
use gradeflow_avatar::domain::{ImageReference, ObjectUrlRegistry};
use gradeflow_avatar::infrastructure::config::CropArgs;
use gradeflow_avatar::infrastructure::{
    ApiPathResolver, AppConfig, CliArgs, Command, DesktopNotificationService, GradeFlowApiClient,
    InMemoryObjectUrlRegistry, KeyringCredentialStorage, MemoryCredentialStorage, PngRasterizer,
    ReqwestImageTransport, StorageManager,
};
use gradeflow_avatar::infrastructure::image::DEFAULT_COLOR_CAPACITY;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(storage: &StorageManager, args: &CliArgs) -> Result<AppConfig> {
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    config.sanitize();
    Ok(config)
}

/// Adapters shared by every command.
struct Services {
    config: AppConfig,
    storage: StorageManager,
    session: Arc<MemoryCredentialStorage>,
    keyring: Arc<KeyringCredentialStorage>,
    api: Arc<GradeFlowApiClient>,
    registry: Arc<InMemoryObjectUrlRegistry>,
    toasts: Arc<ToastQueue>,
    desktop: DesktopNotificationService,
}

impl Services {
    async fn build(
        storage: StorageManager,
        config: AppConfig,
        cli_token: Option<String>,
    ) -> Result<Self> {
        let keyring = Arc::new(KeyringCredentialStorage::new());
        let session = Arc::new(
            match ResolveTokenUseCase::new(keyring.clone()).execute(cli_token).await {
                Some(resolved) => MemoryCredentialStorage::with_token(resolved.token),
                None => MemoryCredentialStorage::new(),
            },
        );

        let api = Arc::new(GradeFlowApiClient::new(
            &config.api_base_url,
            config.request_timeout(),
            session.clone(),
        )?);

        Ok(Self {
            toasts: Arc::new(ToastQueue::new(config.notification_duration())),
            desktop: DesktopNotificationService::new(config.notifications.desktop),
            registry: Arc::new(InMemoryObjectUrlRegistry::new()),
            session,
            keyring,
            api,
            config,
            storage,
        })
    }

    fn loader(&self) -> Result<AvatarImageLoader> {
        let transport = ReqwestImageTransport::new(self.config.request_timeout())?;
        Ok(AvatarImageLoader::new(
            Arc::new(ApiPathResolver::new(&self.config.api_base_url)),
            self.session.clone(),
            Arc::new(transport),
            self.registry.clone(),
        ))
    }

    fn editor(&self) -> AvatarEditor {
        AvatarEditor::new(
            self.api.clone(),
            self.registry.clone(),
            Arc::new(PngRasterizer::default()),
            self.toasts.clone(),
            self.config.editor,
        )
    }

    fn login(&self) -> LoginUseCase {
        LoginUseCase::new(self.api.clone(), self.session.clone(), self.keyring.clone())
    }

    /// Prints queued toasts and mirrors them to the desktop.
    fn flush_notifications(&self) {
        for notification in self.toasts.drain() {
            if notification.level.is_problem() {
                eprintln!("[{}] {}", notification.level, notification.summary());
            } else {
                println!("{}", notification.summary());
            }
            self.desktop
                .send(notification.level, &notification.title, &notification.message);
        }
    }
}

async fn read_picked_file(path: &Path) -> Result<AvatarFile> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(AvatarFile::new(
        file_name,
        AvatarFile::media_type_for_extension(&extension),
        bytes,
    ))
}

async fn open_draft(editor: &mut AvatarEditor, input: &Path, crop: CropArgs) -> Result<()> {
    editor.select_file(read_picked_file(input).await?).await?;
    editor.set_zoom(crop.zoom);
    editor.set_offset(crop.offset_x, crop.offset_y);
    if let Some(draft) = editor.draft() {
        let rect = draft.crop_rect();
        info!(x = rect.x, y = rect.y, size = rect.size, "Crop region selected");
    }
    Ok(())
}

async fn fetch(services: &Services, path: Option<String>, out: Option<&Path>) -> Result<()> {
    let (reference, display_name) = match path {
        Some(path) => (ImageReference::new(path), None),
        None => {
            let profile = services.api.current_profile().await?;
            let name = profile.display_name().to_string();
            (profile.avatar.and_then(ImageReference::new), Some(name))
        }
    };

    let loader = services.loader()?;
    loader.set_path(reference);
    let state = loader.settled().await;

    let loaded = match (&state.outcome, &state.display) {
        (LoadOutcome::Loaded | LoadOutcome::PassThrough, Some(url)) => {
            services.registry.lookup(url)
        }
        _ => None,
    };

    match loaded {
        Some((bytes, media_type)) => {
            if let Some(out) = out {
                tokio::fs::write(out, &bytes).await?;
                println!("Saved {} bytes ({media_type}) to {}", bytes.len(), out.display());
            } else {
                println!("Loaded {} bytes ({media_type})", bytes.len());
            }
        }
        None => {
            if let LoadOutcome::Failed(e) = &state.outcome {
                warn!(error = %e, "Avatar unavailable");
            }
            let colors = services.storage.load_colors(DEFAULT_COLOR_CAPACITY);
            let placeholder = placeholder_for(display_name.as_deref().unwrap_or(""), &colors);
            if let Err(e) = services.storage.save_colors(&colors) {
                warn!(error = %e, "Could not save placeholder colors");
            }
            println!(
                "No avatar image; placeholder {} on {}",
                placeholder.initials, placeholder.color
            );
        }
    }

    drop(loader);
    Ok(())
}

async fn run(services: &Services, args: CliArgs) -> Result<()> {
    match args.command {
        Command::Fetch { path, out } => fetch(services, path, out.as_deref()).await,
        Command::Crop { input, crop, out } => {
            let mut editor = services.editor();
            open_draft(&mut editor, &input, crop).await?;
            let png = editor.render().await?;
            tokio::fs::write(&out, &png).await?;
            editor.cancel();
            println!("Wrote {} ({} bytes)", out.display(), png.len());
            Ok(())
        }
        Command::Upload { input, crop } => {
            let mut editor = services.editor();
            open_draft(&mut editor, &input, crop).await?;
            let profile = editor.confirm().await?;
            if let Some(avatar) = profile.avatar {
                println!("Avatar path: {avatar}");
            }
            Ok(())
        }
        Command::Remove => {
            let profile = services.api.current_profile().await?;
            services.editor().remove_avatar(profile.has_avatar()).await?;
            Ok(())
        }
        Command::Login => {
            let token = args
                .token
                .ok_or_else(|| eyre!("pass the token with --token or GRADEFLOW_TOKEN"))?;
            let response = services.login().execute(LoginRequest::new(token)).await?;
            println!(
                "Signed in as {}{}",
                response.profile.display_name(),
                if response.token_persisted {
                    ""
                } else {
                    " (token not saved)"
                }
            );
            Ok(())
        }
        Command::Logout => {
            services.login().logout().await?;
            println!("Signed out");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let config = load_config(&storage, &args)?;
    init_logging(&config)?;

    info!(version = gradeflow_avatar::VERSION, "Starting GradeFlow avatar");

    let cli_token = args.token.clone();
    let services = Services::build(storage, config, cli_token).await?;
    let result = run(&services, args).await;

    services.flush_notifications();
    if services.registry.live_count() > 0 {
        warn!(live = services.registry.live_count(), "Local image URLs still registered at exit");
    }

    result
}
