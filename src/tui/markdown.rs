//! Markdown → ratatui `Text` renderer for bot answers.
//!
//! Walks `pulldown_cmark` events and emits styled `Line`/`Span` values:
//! headings, emphasis, inline code, fenced code (highlighted with syntect),
//! bullet and numbered lists, blockquotes, rules and links. A terminal can't
//! open a browser tab, so links print their target after the label.
//!
//! Input is often a half-revealed answer from the typewriter, so unterminated
//! constructs (an open `**`, a fence without its closing line) must render
//! as whatever pulldown-cmark makes of them, never panic.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";
const RULE_WIDTH: usize = 40;
const TAB: &str = "    ";

const LINK_STYLE: Style = Style::new().fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED);
const URL_STYLE: Style = Style::new().fg(Color::DarkGray);
const MARKER_STYLE: Style = Style::new().fg(Color::DarkGray);
const INLINE_CODE_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

/// Render markdown into owned, styled text. Unstyled runs use `base_fg`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut r = Renderer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        r.handle(event);
    }
    r.text
}

/// Plain, unstyled text of a rendered block, one `String` per line.
/// Used for measuring and in tests.
pub fn plain_lines(text: &Text<'_>) -> Vec<String> {
    text.lines
        .iter()
        .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

/// Markdown flattened to plain text, each line wrapped to `width` columns.
/// For printing answers outside the TUI.
pub fn to_plain(content: &str, width: usize) -> String {
    plain_lines(&render(content, Color::Reset))
        .iter()
        .map(|line| textwrap::fill(line, width.max(1)))
        .collect::<Vec<_>>()
        .join("\n")
}

struct Renderer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack. Each entry is already patched onto its parent so
    /// nested bold+italic composes.
    styles: Vec<Style>,
    /// Spans prepended to every new line (blockquote and code gutters).
    gutters: Vec<Span<'static>>,
    /// One entry per open list: `None` bullets, `Some(n)` next number.
    lists: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_code_block: bool,
    link_target: Option<String>,
    /// A block just closed; the next block starts after a blank line.
    pending_gap: bool,
    /// The last line holds only a list marker, so the item's first
    /// paragraph continues it.
    item_open: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            highlighter: None,
            in_code_block: false,
            link_target: None,
            pending_gap: false,
            item_open: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn new_line(&mut self, mut line: Line<'static>) {
        for gutter in self.gutters.iter().rev() {
            line.spans.insert(0, gutter.clone());
        }
        self.text.lines.push(line);
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(Line::from(vec![span])),
        }
    }

    fn gap(&mut self) {
        if self.pending_gap {
            self.new_line(Line::default());
            self.pending_gap = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.push_span(Span::styled(c.into_string(), INLINE_CODE_STYLE)),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.new_line(Line::default()),
            Event::Rule => {
                self.gap();
                self.new_line(Line::from(Span::styled("─".repeat(RULE_WIDTH), MARKER_STYLE)));
                self.pending_gap = true;
            }
            Event::TaskListMarker(done) => {
                self.push_span(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let continues_item = std::mem::take(&mut self.item_open);
        match tag {
            // Loose list items wrap their text in a paragraph
            Tag::Paragraph if continues_item => self.pending_gap = false,
            Tag::Paragraph => {
                self.gap();
                self.new_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.gap();
                let style = heading_style(self.base_fg, level);
                self.new_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(heading_depth(level))),
                    style,
                )));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.gap();
                self.gutters.push(Span::styled("│ ", MARKER_STYLE));
                self.push_style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.gap();
                self.new_line(Line::default());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    Some(None) => format!("{indent}• "),
                    None => return,
                };
                self.push_span(Span::styled(marker, MARKER_STYLE));
                self.item_open = true;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_target = Some(dest_url.into_string());
                self.push_style(LINK_STYLE);
            }
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.new_line(Line::default());
        }
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.as_ref(),
            CodeBlockKind::Indented => "",
        };

        let top = if lang.is_empty() {
            Line::from(Span::styled("╭──", MARKER_STYLE))
        } else {
            Line::from(vec![
                Span::styled("╭── ", MARKER_STYLE),
                Span::styled(lang.to_owned(), MARKER_STYLE.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", MARKER_STYLE),
            ])
        };
        self.new_line(top);
        self.gutters.push(Span::styled("│ ", MARKER_STYLE));

        if !lang.is_empty() {
            if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang) {
                if let Some(theme) = THEME_SET.themes.get(CODE_THEME) {
                    self.highlighter = Some(HighlightLines::new(syntax, theme));
                }
            }
        }
        self.in_code_block = true;
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.pending_gap = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.pending_gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.pop_style();
                self.pending_gap = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_code_block = false;
                self.gutters.pop();
                self.new_line(Line::from(Span::styled("╰──", MARKER_STYLE)));
                self.pending_gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                // A nested list hands back to its parent item without a gap
                self.pending_gap = self.lists.is_empty();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_target.take() {
                    self.push_span(Span::styled(format!(" ({url})"), URL_STYLE));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        self.item_open = false;
        // ratatui renders \t as zero width
        let text = cow.replace('\t', TAB);

        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(&text) {
                let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) else {
                    continue;
                };
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(style, frag)| {
                        let frag = frag.trim_end_matches('\n');
                        if frag.is_empty() {
                            return None;
                        }
                        let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                        Some(Span::styled(frag.to_owned(), Style::default().fg(fg)))
                    })
                    .collect();
                self.new_line(Line::from(spans));
            }
            self.highlighter = Some(hl);
            return;
        }

        if self.in_code_block {
            let style = Style::default().fg(Color::White);
            for line in text.lines() {
                self.new_line(Line::from(Span::styled(line.to_owned(), style)));
            }
            return;
        }

        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
