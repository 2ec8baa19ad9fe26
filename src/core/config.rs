use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub media: MediaConfig,
    pub feed: FeedConfig,
    pub map: MapConfig,
    pub locations: LocationsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Which service receives uploaded photos and videos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    Cloudinary,
    MinIO,
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    /// Largest accepted upload in bytes
    pub max_file_size: usize,
    pub cloudinary: CloudinaryConfig,
    pub minio: MinIOConfig,
}

/// Cloudinary unsigned upload settings
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Base of the upload API, without the cloud name
    pub api_base: String,
    pub cloud_name: String,
    /// Name of an unsigned upload preset configured in the Cloudinary console
    pub upload_preset: String,
    pub timeout: Duration,
}

/// MinIO/S3 storage configuration for self-hosted media
#[derive(Debug, Clone)]
pub struct MinIOConfig {
    /// MinIO/S3 endpoint URL
    pub endpoint: String,
    /// Public endpoint URL used in returned links (defaults to endpoint)
    pub public_endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// AWS region (for S3 compatibility)
    pub region: String,
    /// Prefix readable anonymously (e.g., "public")
    pub public_prefix: String,
}

/// Live feed tuning
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Number of buffered events per subscriber before it must resync
    pub channel_capacity: usize,
    /// Number of reports sent in the initial snapshot
    pub snapshot_limit: i64,
    /// Delay before re-establishing a dropped LISTEN connection
    pub reconnect_delay: Duration,
}

/// Settings handed to the map widget
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub tile_url: String,
    pub attribution: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
    pub user_location_radius_m: f64,
}

#[derive(Debug, Clone)]
pub struct LocationsConfig {
    /// Optional replacement for the embedded location dataset
    pub path: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            media: MediaConfig::from_env()?,
            feed: FeedConfig::from_env()?,
            map: MapConfig::from_env()?,
            locations: LocationsConfig::from_env(),
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        _ => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Pothole Patrol Nepal API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen pothole reports for Nepal".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl MediaConfig {
    const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024; // 50MB, videos included

    pub fn from_env() -> Result<Self, String> {
        let backend = match env::var("MEDIA_BACKEND")
            .unwrap_or_else(|_| "cloudinary".to_string())
            .to_lowercase()
            .as_str()
        {
            "cloudinary" => MediaBackend::Cloudinary,
            "minio" | "s3" => MediaBackend::MinIO,
            other => {
                return Err(format!(
                    "MEDIA_BACKEND must be 'cloudinary' or 'minio', got '{}'",
                    other
                ))
            }
        };

        Ok(Self {
            backend,
            max_file_size: parse_env("MEDIA_MAX_FILE_SIZE", Self::DEFAULT_MAX_FILE_SIZE)?,
            cloudinary: CloudinaryConfig::from_env(backend == MediaBackend::Cloudinary)?,
            minio: MinIOConfig::from_env(),
        })
    }
}

impl CloudinaryConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// `required` makes the cloud name mandatory when Cloudinary is the active backend
    pub fn from_env(required: bool) -> Result<Self, String> {
        let cloud_name = env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
        if required && cloud_name.trim().is_empty() {
            return Err("CLOUDINARY_CLOUD_NAME must be set when MEDIA_BACKEND=cloudinary".into());
        }

        let api_base = env::var("CLOUDINARY_API_BASE")
            .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string())
            .trim_end_matches('/')
            .to_string();

        let upload_preset =
            env::var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_else(|_| "pothole_upload".to_string());

        let timeout_secs = parse_env("CLOUDINARY_TIMEOUT_SECS", Self::DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            api_base,
            cloud_name,
            upload_preset,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl MinIOConfig {
    pub fn from_env() -> Self {
        let endpoint =
            env::var("MINIO_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public endpoint defaults to the main endpoint if not specified
        let public_endpoint =
            env::var("MINIO_PUBLIC_ENDPOINT").unwrap_or_else(|_| endpoint.clone());

        Self {
            endpoint,
            public_endpoint,
            access_key: env::var("MINIO_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("MINIO_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string()),
            bucket: env::var("MINIO_BUCKET").unwrap_or_else(|_| "pothole-media".to_string()),
            region: env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            public_prefix: env::var("MINIO_PUBLIC_PREFIX")
                .unwrap_or_else(|_| "public".to_string()),
        }
    }
}

impl FeedConfig {
    const DEFAULT_CHANNEL_CAPACITY: usize = 256;
    const DEFAULT_SNAPSHOT_LIMIT: i64 = 100;
    const DEFAULT_RECONNECT_DELAY_SECS: u64 = 5;

    pub fn from_env() -> Result<Self, String> {
        let channel_capacity = parse_env("FEED_CHANNEL_CAPACITY", Self::DEFAULT_CHANNEL_CAPACITY)?;
        if channel_capacity == 0 {
            return Err("FEED_CHANNEL_CAPACITY must be greater than zero".to_string());
        }

        let reconnect_delay_secs = parse_env(
            "FEED_RECONNECT_DELAY_SECS",
            Self::DEFAULT_RECONNECT_DELAY_SECS,
        )?;

        Ok(Self {
            channel_capacity,
            snapshot_limit: parse_env("FEED_SNAPSHOT_LIMIT", Self::DEFAULT_SNAPSHOT_LIMIT)?.max(1),
            reconnect_delay: Duration::from_secs(reconnect_delay_secs),
        })
    }
}

impl MapConfig {
    const DEFAULT_TILE_URL: &'static str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
    const DEFAULT_ATTRIBUTION: &'static str =
        "&copy; <a href=\"https://osm.org/copyright\">OpenStreetMap</a>";
    // Kathmandu
    const DEFAULT_CENTER_LAT: f64 = 27.7172;
    const DEFAULT_CENTER_LNG: f64 = 85.324;
    const DEFAULT_ZOOM: u8 = 12;
    const DEFAULT_USER_LOCATION_RADIUS_M: f64 = 50.0;

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            tile_url: env::var("MAP_TILE_URL").unwrap_or_else(|_| Self::DEFAULT_TILE_URL.into()),
            attribution: env::var("MAP_ATTRIBUTION")
                .unwrap_or_else(|_| Self::DEFAULT_ATTRIBUTION.into()),
            center_lat: parse_env("MAP_CENTER_LAT", Self::DEFAULT_CENTER_LAT)?,
            center_lng: parse_env("MAP_CENTER_LNG", Self::DEFAULT_CENTER_LNG)?,
            zoom: parse_env("MAP_ZOOM", Self::DEFAULT_ZOOM)?,
            user_location_radius_m: parse_env(
                "MAP_USER_LOCATION_RADIUS_M",
                Self::DEFAULT_USER_LOCATION_RADIUS_M,
            )?,
        })
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: Self::DEFAULT_TILE_URL.to_string(),
            attribution: Self::DEFAULT_ATTRIBUTION.to_string(),
            center_lat: Self::DEFAULT_CENTER_LAT,
            center_lng: Self::DEFAULT_CENTER_LNG,
            zoom: Self::DEFAULT_ZOOM,
            user_location_radius_m: Self::DEFAULT_USER_LOCATION_RADIUS_M,
        }
    }
}

impl LocationsConfig {
    pub fn from_env() -> Self {
        Self {
            path: env::var("LOCATIONS_PATH").ok().filter(|s| !s.trim().is_empty()),
        }
    }
}
