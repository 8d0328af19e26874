use std::path::PathBuf;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use log::{debug, warn};

const LABEL_FONT: &str = "label_cjk";

/// System fonts that carry the unit suffix glyph, most preferred first.
fn font_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(windir) = std::env::var_os("WINDIR") {
        let fonts = PathBuf::from(windir).join("Fonts");
        candidates.push(fonts.join("msyhbd.ttc"));
        candidates.push(fonts.join("msyh.ttc"));
        candidates.push(fonts.join("simhei.ttf"));
    }
    candidates.extend(
        [
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
        ]
        .map(PathBuf::from),
    );
    candidates
}

fn load_label_font_bytes() -> Option<Vec<u8>> {
    font_candidates().into_iter().find_map(|path| {
        let bytes = std::fs::read(&path).ok()?;
        debug!("Using label font {}", path.display());
        Some(bytes)
    })
}

pub fn install_label_font(ctx: &egui::Context) {
    let Some(bytes) = load_label_font_bytes() else {
        warn!("No CJK system font found, the unit suffix may not render");
        return;
    };
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(LABEL_FONT.to_owned(), FontData::from_owned(bytes));
    if let Some(family) = fonts.families.get_mut(&FontFamily::Proportional) {
        family.insert(0, LABEL_FONT.to_owned());
    }
    ctx.set_fonts(fonts);
}
