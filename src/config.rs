pub const APP_ID: &str = "io.github.legalbot.Chat";
pub const GETTEXT_PACKAGE: &str = "legalbot-chat";
pub const LOCALEDIR: &str = match option_env!("LEGALBOT_LOCALEDIR") {
    Some(dir) => dir,
    None => "/usr/share/locale",
};
pub const PROFILE: &str = match option_env!("LEGALBOT_PROFILE") {
    Some(profile) => profile,
    None => "Default",
};
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
