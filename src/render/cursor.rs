use crate::session::timeline::TranscriptTimeline;

/// Forward bias, in characters, applied while a block is still in progress.
/// Compensates for perceived lag between speech and transcript display; an
/// empirical feel constant.
pub const CURSOR_LOOKAHEAD_CHARS: f64 = 3.0;

/// Spans shorter than this are treated as zero-length when computing
/// progress, to keep the division stable.
const MIN_PROGRESS_SPAN: f64 = 0.01;

/// Where the text cursor lands: a character offset inside a block's text,
/// or (with `block_index == blocks.len()`) appended after everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub block_index: usize,
    pub char_offset: usize,
}

/// Alternating runs of whitespace / non-whitespace.
fn runs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_ws: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        if let Some(prev) = prev_ws {
            if prev != ws {
                out.push(&text[start..i]);
                start = i;
            }
        }
        prev_ws = Some(ws);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Nearest token-boundary character offset to `target`. Boundaries are the
/// edges between whitespace and word runs (plus both ends), so the cursor
/// can never land mid-word. Earlier boundaries win ties.
fn nearest_boundary(text: &str, target: f64) -> usize {
    let mut best = 0usize;
    let mut best_diff = target.abs();
    let mut running = 0usize;
    for token in runs(text) {
        running += token.chars().count();
        let diff = (target - running as f64).abs();
        if diff < best_diff {
            best_diff = diff;
            best = running;
        }
    }
    best
}

/// Map the playhead to a character-insertion point across the timeline.
///
/// Walks blocks in order; inside a block, progress runs against the speech
/// end (not the block end) so trailing silence never drags the cursor past
/// the text. Pure function of state; callers skip it entirely while
/// recording.
pub fn cursor_position(timeline: &TranscriptTimeline, duration: f64, time: f64) -> CursorPosition {
    let blocks = timeline.blocks();
    for (i, block) in blocks.iter().enumerate() {
        let block_end = block.end_time.unwrap_or_else(|| {
            blocks
                .get(i + 1)
                .map(|next| next.start_time)
                .unwrap_or(duration)
        });

        if time < block.start_time {
            return CursorPosition {
                block_index: i,
                char_offset: 0,
            };
        }

        if time >= block.start_time && time <= block_end {
            let effective_end = block.speech_end_time.unwrap_or(block_end);
            let span = effective_end - block.start_time;
            let progress = if time < effective_end {
                if span > MIN_PROGRESS_SPAN {
                    (time - block.start_time) / span
                } else {
                    0.0
                }
            } else {
                1.0
            };

            let total = block.text.chars().count() as f64;
            let mut target = total * progress;
            if progress < 1.0 {
                target += CURSOR_LOOKAHEAD_CHARS;
            }

            return CursorPosition {
                block_index: i,
                char_offset: nearest_boundary(&block.text, target),
            };
        }
    }

    CursorPosition {
        block_index: blocks.len(),
        char_offset: 0,
    }
}

/// The full transcript with a cursor marker spliced in at `pos`.
pub fn transcript_with_cursor(timeline: &TranscriptTimeline, pos: CursorPosition, marker: &str) -> String {
    let blocks = timeline.blocks();
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        if i == pos.block_index {
            for (n, ch) in block.text.chars().enumerate() {
                if n == pos.char_offset {
                    out.push_str(marker);
                }
                out.push(ch);
            }
            if pos.char_offset >= block.text.chars().count() {
                out.push_str(marker);
            }
        } else {
            out.push_str(&block.text);
        }
    }
    if pos.block_index >= blocks.len() {
        out.push_str(marker);
    }
    out
}
