use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use color_eyre::eyre::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlAuth {
    #[serde(rename = "sessionSecret")]
    session_secret: String,
    #[serde(rename = "sessionMaxAgeHours")]
    session_max_age_hours: Option<i64>,
    #[serde(rename = "credentialExpireSeconds")]
    credential_expire_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlMediaCdn {
    #[serde(rename = "urlEndpoint")]
    url_endpoint: String,
    #[serde(rename = "publicKey")]
    public_key: String,
    #[serde(rename = "privateKey")]
    private_key: String,
    #[serde(rename = "uploadApiUrl")]
    upload_api_url: Option<String>,
    #[serde(rename = "maxImageSize")]
    max_image_size: Option<String>,
    #[serde(rename = "maxVideoSize")]
    max_video_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    address: Option<String>,
    port: Option<u16>,
    #[serde(rename = "dataDir")]
    data_dir: String,
    auth: TomlAuth,
    #[serde(rename = "mediaCdn")]
    media_cdn: TomlMediaCdn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_max_age_hours: i64,
    pub credential_expire_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCdnConfig {
    pub url_endpoint: String,
    pub public_key: String,
    pub private_key: String,
    pub upload_api_url: String,
    pub max_image_size: u64,
    pub max_video_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub data_dir: PathBuf,
    pub auth: AuthConfig,
    pub media_cdn: MediaCdnConfig,
}

const DEFAULT_UPLOAD_API_URL: &str = "https://upload.imagekit.io/api/v1/files/upload";
const DEFAULT_MAX_IMAGE_SIZE: u64 = 100 * 1024 * 1024;
const DEFAULT_MAX_VIDEO_SIZE: u64 = 500 * 1024 * 1024;

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    parse_config(&toml_str)
}

fn parse_config(toml_str: &str) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    if toml_config.auth.session_secret.is_empty() {
        bail!("Error parsing config: auth.sessionSecret must not be empty");
    }
    let session_max_age_hours = match toml_config.auth.session_max_age_hours {
        Some(hours) if hours > 0 => hours,
        Some(other) => bail!("Error parsing config: invalid sessionMaxAgeHours {}", other),
        None => 72,
    };
    let credential_expire_seconds = match toml_config.auth.credential_expire_seconds {
        Some(secs) if secs > 0 => secs,
        Some(other) => bail!(
            "Error parsing config: invalid credentialExpireSeconds {}",
            other
        ),
        None => 1800,
    };
    let max_image_size = toml_config
        .media_cdn
        .max_image_size
        .as_ref()
        .map(|s| parse_size::parse_size(s))
        .transpose()
        .map_err(|err| color_eyre::eyre::eyre!("Error parsing config maxImageSize: {}", err))?
        .unwrap_or(DEFAULT_MAX_IMAGE_SIZE);
    let max_video_size = toml_config
        .media_cdn
        .max_video_size
        .as_ref()
        .map(|s| parse_size::parse_size(s))
        .transpose()
        .map_err(|err| color_eyre::eyre::eyre!("Error parsing config maxVideoSize: {}", err))?
        .unwrap_or(DEFAULT_MAX_VIDEO_SIZE);
    Ok(Config {
        address: toml_config.address,
        port: toml_config.port,
        data_dir: PathBuf::from(toml_config.data_dir),
        auth: AuthConfig {
            session_secret: toml_config.auth.session_secret,
            session_max_age_hours,
            credential_expire_seconds,
        },
        media_cdn: MediaCdnConfig {
            url_endpoint: toml_config.media_cdn.url_endpoint,
            public_key: toml_config.media_cdn.public_key,
            private_key: toml_config.media_cdn.private_key,
            upload_api_url: toml_config
                .media_cdn
                .upload_api_url
                .unwrap_or_else(|| DEFAULT_UPLOAD_API_URL.to_owned()),
            max_image_size,
            max_video_size,
        },
    })
}

#[cfg(test)]
mod test {
    use claims::{assert_err, assert_ok};
    use pretty_assertions::assert_eq;

    use super::parse_config;

    const MINIMAL: &str = r#"
dataDir = "./data"

[auth]
sessionSecret = "not-a-real-secret"

[mediaCdn]
urlEndpoint = "https://ik.imagekit.io/demo"
publicKey = "public_xyz"
privateKey = "private_xyz"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = assert_ok!(parse_config(MINIMAL));
        assert_eq!(config.auth.session_max_age_hours, 72);
        assert_eq!(config.auth.credential_expire_seconds, 1800);
        assert_eq!(config.media_cdn.max_image_size, 100 * 1024 * 1024);
        assert_eq!(config.media_cdn.max_video_size, 500 * 1024 * 1024);
        assert_eq!(
            config.media_cdn.upload_api_url,
            "https://upload.imagekit.io/api/v1/files/upload"
        );
    }

    #[test]
    fn size_limits_are_parsed_from_human_readable_strings() {
        let with_sizes = format!("{}maxImageSize = \"20MB\"\nmaxVideoSize = \"1GB\"\n", MINIMAL);
        let config = assert_ok!(parse_config(&with_sizes));
        assert_eq!(config.media_cdn.max_image_size, 20 * 1000 * 1000);
        assert_eq!(config.media_cdn.max_video_size, 1000 * 1000 * 1000);
    }

    #[test]
    fn empty_session_secret_is_rejected() {
        let bad = MINIMAL.replace("not-a-real-secret", "");
        assert_err!(parse_config(&bad));
    }
}
