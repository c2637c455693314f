use crate::font::Font;
use crate::canvas::LINE_SPACING;

/// Font size divisor for A4 grid cells: `font_size = cell_height / 12`
pub const A4_FONT_DIVISOR: u32 = 12;

/// Font size divisor for labels: `font_size = label_height / 10`
pub const LABEL_FONT_DIVISOR: u32 = 10;

/// Share of the cell width a caption line may take up
pub const WRAP_FRACTION: f32 = 0.85;

/// The pixel area a caption has to fit into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn new(width: u32, height: u32) -> CellSize {
        CellSize { width, height }
    }
}

/// A font size, in pixels, and the number of characters per wrapped line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFit {
    pub font_size: u32,
    pub wrap_width: usize,
}

/// Decides how large a caption is drawn and where it wraps.
///
/// `text` is the caption candidate: its first line is the wrappable primary field,
/// any further lines are drawn as they are. Strategies that do not measure text
/// are free to ignore it.
pub trait FitStrategy {
    fn fit(&self, cell: CellSize, text: &str) -> TextFit;
}

/// The single-pass fit: the font size is a fixed fraction of the cell height and the
/// wrap width assumes every glyph is roughly as wide as the font size. Nothing is
/// measured, so long or wide strings can still overflow the cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicFit {
    pub divisor: u32,
    pub fraction: f32,
}

impl HeuristicFit {
    pub const fn new(divisor: u32, fraction: f32) -> HeuristicFit {
        HeuristicFit { divisor, fraction }
    }

    pub const fn a4() -> HeuristicFit {
        HeuristicFit::new(A4_FONT_DIVISOR, WRAP_FRACTION)
    }

    pub const fn label() -> HeuristicFit {
        HeuristicFit::new(LABEL_FONT_DIVISOR, WRAP_FRACTION)
    }

    pub fn font_size(&self, cell: CellSize) -> u32 {
        (cell.height / self.divisor.max(1)).max(1)
    }

    /// Characters per line at a given font size
    pub fn wrap_width(&self, cell: CellSize, font_size: u32) -> usize {
        let chars = (self.fraction * cell.width as f32) / font_size.max(1) as f32;
        (chars.floor() as usize).max(1)
    }
}

impl FitStrategy for HeuristicFit {
    fn fit(&self, cell: CellSize, _text: &str) -> TextFit {
        let font_size = self.font_size(cell);
        TextFit {
            font_size,
            wrap_width: self.wrap_width(cell, font_size),
        }
    }
}

/// A measure-and-shrink fit. Starts at the heuristic font size, narrows the wrap width
/// until every line fits `fraction` of the cell width when rendered with `font`, and
/// steps the font size down a pixel at a time until the block also fits the cell
/// height. Gives up at `min_size`, returning the best effort at that size.
pub struct MeasuredFit<'f> {
    pub font: &'f Font,
    pub start: HeuristicFit,
    pub min_size: u32,
}

impl<'f> MeasuredFit<'f> {
    pub fn new(font: &'f Font, start: HeuristicFit) -> MeasuredFit<'f> {
        MeasuredFit {
            font,
            start,
            min_size: 6,
        }
    }

    fn block_size(&self, lines: &[String], size: f32) -> (f32, f32) {
        let widest = lines
            .iter()
            .map(|line| self.font.width_of_text(line, size))
            .fold(0.0, f32::max);
        let line_height = self.font.line_height(size) + LINE_SPACING;
        (widest, line_height * lines.len() as f32)
    }
}

impl FitStrategy for MeasuredFit<'_> {
    fn fit(&self, cell: CellSize, text: &str) -> TextFit {
        let (primary, rest) = text.split_once('\n').unwrap_or((text, ""));
        let fixed: Vec<String> = rest.lines().map(str::to_string).collect();
        let max_width = self.start.fraction * cell.width as f32;
        let max_height = cell.height as f32;

        let start_size = self.start.font_size(cell);
        let min_size = self.min_size.clamp(1, start_size);
        for font_size in (min_size..=start_size).rev() {
            let size = font_size as f32;
            let mut wrap_width = self.start.wrap_width(cell, font_size);
            loop {
                let mut lines = wrap(primary, wrap_width);
                lines.extend(fixed.iter().cloned());
                let (width, height) = self.block_size(&lines, size);
                if width <= max_width || wrap_width == 1 {
                    if width <= max_width && height <= max_height {
                        return TextFit {
                            font_size,
                            wrap_width,
                        };
                    }
                    break;
                }
                wrap_width -= 1;
            }
        }

        TextFit {
            font_size: min_size,
            wrap_width: self.start.wrap_width(cell, min_size),
        }
    }
}

/// Word-wrap `text` to at most `width` characters per line, breaking on ASCII whitespace only.
/// A word longer than `width` is placed on a line of its own, unbroken.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in text.split_ascii_whitespace() {
        let word_len = word.chars().count();
        if line_len == 0 {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= width {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }
    if line_len > 0 {
        lines.push(line);
    }

    lines
}

/// A fitted caption: the wrapped primary field followed by the identifier lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub lines: Vec<String>,
    pub fit: TextFit,
}

impl Caption {
    /// Wrap `primary` at the fitted width and append `identifier` unwrapped
    pub fn compose(fit: TextFit, primary: &str, identifier: Vec<String>) -> Caption {
        let mut lines = wrap(primary, fit.wrap_width);
        lines.extend(identifier);
        Caption { lines, fit }
    }

    /// The caption as one newline-joined block, ready to draw
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Fit a caption into a cell with the given strategy
pub fn fit_caption<F: FitStrategy + ?Sized>(
    strategy: &F,
    cell: CellSize,
    primary: &str,
    identifier: Vec<String>,
) -> Caption {
    let mut candidate = primary.to_string();
    for line in identifier.iter() {
        candidate.push('\n');
        candidate.push_str(line);
    }
    let fit = strategy.fit(cell, &candidate);
    Caption::compose(fit, primary, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dejavu() -> Font {
        Font::load(include_bytes!("../../assets/DejaVuSans.ttf").to_vec()).expect("can load font")
    }

    #[test]
    fn heuristic_a4_cell() {
        // A4 cell is 776 x 419 with a 377px code, leaving 399px for text
        let fit = HeuristicFit::a4().fit(CellSize::new(399, 419), "");
        assert_eq!(fit, TextFit { font_size: 34, wrap_width: 9 });
    }

    #[test]
    fn heuristic_default_label() {
        let fit = HeuristicFit::label().fit(CellSize::new(1063, 342), "");
        assert_eq!(fit, TextFit { font_size: 34, wrap_width: 26 });
    }

    #[test]
    fn heuristic_never_divides_by_zero() {
        let fit = HeuristicFit::a4().fit(CellSize::new(0, 3), "");
        assert_eq!(fit, TextFit { font_size: 1, wrap_width: 1 });
    }

    #[test]
    fn wraps_on_whitespace() {
        assert_eq!(
            wrap("Lake Alpha at the north inlet", 10),
            vec!["Lake Alpha", "at the", "north", "inlet"]
        );
        assert_eq!(wrap("  spaced   out  ", 20), vec!["spaced out"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn non_breaking_spaces_hold_words_together() {
        assert_eq!(
            wrap("Lake\u{a0}Alpha north\u{a0}inlet", 6),
            vec!["Lake\u{a0}Alpha", "north\u{a0}inlet"]
        );
    }

    #[test]
    fn long_words_are_not_split() {
        assert_eq!(
            wrap("a Manawatūwhenua b", 4),
            vec!["a", "Manawatūwhenua", "b"]
        );
        assert_eq!(wrap("abc", 0), vec!["abc"]);
    }

    #[test]
    fn wrapped_lines_respect_width() {
        let text = "the quick brown fox jumps over the lazy dog near lake taupo at dawn";
        for width in 5..30 {
            for line in wrap(text, width) {
                assert!(line.chars().count() <= width, "{line:?} wider than {width}");
            }
        }
    }

    #[test]
    fn caption_keeps_identifier_last() {
        let caption = fit_caption(
            &HeuristicFit::a4(),
            CellSize::new(399, 419),
            "Lake Alpha North Inlet",
            vec!["ID: S-000000000001".to_string()],
        );
        assert_eq!(caption.lines.last().unwrap(), "ID: S-000000000001");
        assert_eq!(caption.text(), "Lake\nAlpha\nNorth\nInlet\nID: S-000000000001");
    }

    #[test]
    fn measured_fit_shrinks_until_it_fits() {
        let font = dejavu();
        let strategy = MeasuredFit::new(&font, HeuristicFit::a4());
        let cell = CellSize::new(399, 419);
        let text = "Whanganui River at Te Maire Road Bridge Downstream\nID: S1";
        let fit = strategy.fit(cell, text);
        let heuristic = HeuristicFit::a4().fit(cell, text);
        assert!(fit.font_size <= heuristic.font_size);

        let caption = Caption::compose(fit, text.lines().next().unwrap(), vec!["ID: S1".into()]);
        let size = fit.font_size as f32;
        for line in caption.lines.iter() {
            assert!(font.width_of_text(line, size) <= WRAP_FRACTION * 399.0);
        }
        let height = (font.line_height(size) + LINE_SPACING) * caption.lines.len() as f32;
        assert!(height <= 419.0);
    }

    #[test]
    fn measured_fit_gives_up_at_min_size() {
        let font = dejavu();
        let strategy = MeasuredFit::new(&font, HeuristicFit::a4());
        let fit = strategy.fit(CellSize::new(40, 120), "Supercalifragilisticexpialidocious");
        assert_eq!(fit.font_size, 6);
    }
}
