//! Internationalization (i18n) module.
//!
//! Localized strings for CLI help and command output.
//! English is the default; Spanish is the alternative.

use std::sync::OnceLock;

static CURRENT_LANG: OnceLock<Lang> = OnceLock::new();

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    /// English (default)
    En,
    /// Spanish
    Es,
}

impl Lang {
    /// Parse a language code string (e.g. "en", "es", "en_US", "es_ES").
    /// Returns `None` for unrecognized codes.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.to_lowercase();
        let prefix = normalized.split(['_', '-']).next().unwrap_or("");
        match prefix {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }
}

/// Initialize the global language. Call once at startup.
/// If already initialized, this is a no-op.
pub fn set_lang(lang: Lang) {
    let _ = CURRENT_LANG.set(lang);
}

/// Get the currently configured language (defaults to English).
pub fn lang() -> Lang {
    CURRENT_LANG.get().copied().unwrap_or(Lang::En)
}

/// Detect language from the `LANG` / `LC_MESSAGES` environment variables.
pub fn detect_system_lang() -> Lang {
    std::env::var("SPOOLCHECK_LANG")
        .ok()
        .and_then(|v| Lang::from_code(&v))
        .or_else(|| {
            std::env::var("LC_MESSAGES")
                .ok()
                .and_then(|v| Lang::from_code(&v))
        })
        .or_else(|| std::env::var("LANG").ok().and_then(|v| Lang::from_code(&v)))
        .unwrap_or(Lang::En)
}

/// Macro for defining translatable message functions.
/// Each function returns a `&'static str` based on the current language.
macro_rules! msg {
    ($name:ident, $en:expr, $es:expr) => {
        /// Returns a localized string for the current language.
        pub fn $name() -> &'static str {
            match lang() {
                Lang::En => $en,
                Lang::Es => $es,
            }
        }
    };
}

// ── General ──────────────────────────────────────────────────────

msg!(
    app_about,
    "spoolcheck \u{2014} Find spooled outgoing emails by subject and body content.",
    "spoolcheck \u{2014} Busca correos salientes en cola por asunto y contenido."
);
msg!(
    app_long_about,
    "spoolcheck \u{2014} Find spooled outgoing emails by subject and body content.\nPoint it at the directory your application writes emails to instead of\nsending them, and assert that an email was (or was not) sent.",
    "spoolcheck \u{2014} Busca correos salientes en cola por asunto y contenido.\nIndica el directorio donde tu aplicaci\u{f3}n escribe los correos en lugar de\nenviarlos y comprueba si un correo se envi\u{f3} (o no)."
);

// ── CLI help strings ─────────────────────────────────────────────

msg!(
    help_cmd_check,
    "Check whether an email with a subject and content was spooled",
    "Comprobar si se ha encolado un correo con un asunto y contenido"
);
msg!(
    help_cmd_list,
    "List spooled emails",
    "Listar los correos en cola"
);
msg!(
    help_cmd_show,
    "Show the parsed subject and content of one spool file",
    "Mostrar el asunto y contenido de un fichero de la cola"
);
msg!(
    help_cmd_prepare,
    "Create the spool directory and remove leftover emails",
    "Crear el directorio de cola y eliminar correos antiguos"
);
msg!(
    help_cmd_purge,
    "Remove every spooled email",
    "Eliminar todos los correos en cola"
);
msg!(
    help_cmd_completions,
    "Generate shell completions",
    "Generar completions para tu shell"
);
msg!(
    help_cmd_manpage,
    "Generate a man page",
    "Generar p\u{e1}gina de manual"
);

// ── Command output ───────────────────────────────────────────────

msg!(msg_file, "File", "Fichero");
msg!(msg_size, "Size", "Tama\u{f1}o");
msg!(msg_modified, "Modified", "Modificado");
msg!(msg_subject, "Subject", "Asunto");
msg!(msg_content, "Content", "Contenido");
msg!(msg_regions, "Regions", "Regiones");
msg!(msg_emails, "email(s)", "correo(s)");
msg!(
    msg_email_found,
    "Found an email with that subject and content.",
    "Se ha encontrado un correo con ese asunto y contenido."
);
msg!(
    msg_email_not_found,
    "No email with that subject and content.",
    "No hay ning\u{fa}n correo con ese asunto y contenido."
);
msg!(
    msg_subject_mismatch,
    "subject differs",
    "el asunto no coincide"
);
msg!(msg_missing, "missing", "falta");
msg!(
    msg_no_html_body,
    "no HTML body block",
    "sin bloque de cuerpo HTML"
);
msg!(msg_matches, "matches", "coincide");
msg!(
    msg_prepared,
    "Spool directory ready",
    "Directorio de cola preparado"
);
msg!(msg_purged, "Removed", "Eliminado(s)");

// ── Errors ───────────────────────────────────────────────────────

msg!(
    err_no_spool_dir,
    "No spool directory given. Pass --dir, set SPOOLCHECK_DIR, or set general.spool_dir in the config file.",
    "No se ha indicado directorio de cola. Usa --dir, define SPOOLCHECK_DIR o configura general.spool_dir."
);
msg!(
    err_file_not_found,
    "File not found",
    "Fichero no encontrado"
);
msg!(
    err_expectation_failed,
    "Expectation failed",
    "La comprobaci\u{f3}n ha fallado"
);
