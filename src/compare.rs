//! Page and document comparison entry points.
//!
//! ## Why generic over `Document` and `OutputSink`?
//!
//! The page loop, the early-exit policy and the page-size bookkeeping are the
//! parts most worth testing, and none of them needs a real PDF. Keeping them
//! generic lets the integration tests drive them with in-memory documents and
//! a recording sink, while [`compare_files`] wires in pdfium.
//!
//! ## Early exit
//!
//! When nobody is going to look at per-page results (no verbose report, no
//! diff PDF, no differences vector), the first differing page decides the
//! verdict and the remaining pages are never rasterised. The verdict then
//! reports `pages_differ == 1`.

use crate::config::CompareConfig;
use crate::error::PdfDiffError;
use crate::output::{DocumentVerdict, PageVerdict};
use crate::pipeline::diff::diff_images;
use crate::pipeline::engine::{Document, OutputSink, PageRef, PageSize};
use crate::pipeline::input;
use crate::pipeline::render::PdfiumDocument;
use crate::pipeline::sink::PdfiumSink;
use crate::pipeline::slot::PageSlot;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Compare one page pair, streaming the composite page into `output` if given.
///
/// Either side may be [`PageSlot::Absent`] when the documents have different
/// page counts; a missing page always differs from a present one.
pub fn compare_page<D, S>(
    output: Option<&mut S>,
    first: PageSlot<PageRef<'_, D>>,
    second: PageSlot<PageRef<'_, D>>,
    config: &CompareConfig,
) -> Result<PageVerdict, PdfDiffError>
where
    D: Document,
    S: OutputSink<Document = D>,
{
    let raster_first = first.try_map(|page| page.render(config.dpi))?;
    let raster_second = second.try_map(|page| page.render(config.dpi))?;

    let thumbnail_width = first
        .present()
        .and_then(|page| page.thumbnail_size())
        .map(|(width, _)| width);

    let result = diff_images(
        raster_first.as_ref(),
        raster_second.as_ref(),
        config,
        thumbnail_width,
    );

    if let Some(sink) = output {
        match (&result.diff, first) {
            (Some(diff), _) => {
                sink.paint_image(diff, config.points_per_pixel())?;
                sink.show_page()?;
            }
            (None, PageSlot::Present(page)) if !config.skip_identical => {
                sink.paint_vector_page(page.document, page.index)?;
                sink.show_page()?;
            }
            (None, _) => {}
        }
    }

    Ok(PageVerdict {
        equal: !result.changed,
        thumbnail: result.thumbnail,
    })
}

/// Compare two documents page by page.
///
/// With an `output` sink, every compared page is written to it (unchanged
/// pages are skipped when `config.skip_identical` is set) and the sink is
/// closed before returning. With `collect_differences`, the verdict carries
/// one flag per page.
pub fn compare_documents<D, S>(
    first: &D,
    second: &D,
    mut output: Option<S>,
    collect_differences: bool,
    config: &CompareConfig,
) -> Result<DocumentVerdict, PdfDiffError>
where
    D: Document,
    S: OutputSink<Document = D>,
{
    let start = Instant::now();
    let pages_first = first.page_count();
    let pages_second = second.page_count();
    let pages_total = pages_first.max(pages_second);

    if pages_first != pages_second {
        warn!("Page counts differ: {} vs {}", pages_first, pages_second);
    }

    // The first output page is sized like the first document's first page.
    // Later pages follow the longer document, or the second one on a tie.
    let sizing_for = |index: usize| {
        if (index == 0 && pages_first > 0) || pages_first > pages_second {
            first
        } else {
            second
        }
    };

    let need_full_scan = config.verbose || output.is_some() || collect_differences;
    let mut differences = collect_differences.then(|| Vec::with_capacity(pages_total));
    let mut pages_differ = 0usize;

    if let Some(ref cb) = config.progress_callback {
        cb.on_comparison_start(pages_first, pages_second);
    }

    for index in 0..pages_total {
        if let Some(sink) = output.as_mut() {
            sink.set_page_size(sizing_for(index).page_size(index)?)?;
        }

        let page_first = PageSlot::from((index < pages_first).then(|| PageRef::new(first, index)));
        let page_second =
            PageSlot::from((index < pages_second).then(|| PageRef::new(second, index)));

        let verdict = compare_page(output.as_mut(), page_first, page_second, config)?;
        let differs = !verdict.equal;
        debug!(page = index + 1, differs, "Compared page pair");

        if differs {
            pages_differ += 1;
        }
        if let Some(ref mut flags) = differences {
            flags.push(differs);
        }
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_compared(index + 1, pages_total, differs);
        }

        if differs && !need_full_scan {
            debug!("Stopping at first differing page {}", index + 1);
            break;
        }
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_comparison_complete(pages_differ, pages_total);
    }

    if let Some(sink) = output {
        sink.close()?;
    }

    info!(
        pages_differ,
        pages_total,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Comparison complete"
    );

    Ok(DocumentVerdict {
        pages_first,
        pages_second,
        pages_total,
        pages_differ,
        differences,
    })
}

/// Compare two PDF files on disk.
///
/// Binds pdfium, opens both files and, when `output` is given, writes the
/// diff PDF there.
///
/// # Errors
/// - [`PdfDiffError::FileNotFound`], [`PdfDiffError::NotAPdf`] and the other
///   open errors for either input
/// - [`PdfDiffError::PdfiumBindingFailed`] when no pdfium library is found
/// - rasterisation and output errors from the comparison itself
pub fn compare_files(
    first: impl AsRef<Path>,
    second: impl AsRef<Path>,
    output: Option<&Path>,
    collect_differences: bool,
    config: &CompareConfig,
) -> Result<DocumentVerdict, PdfDiffError> {
    // ── Step 1: Resolve inputs ───────────────────────────────────────────
    let path_first = input::resolve_input(first.as_ref())?;
    let path_second = input::resolve_input(second.as_ref())?;
    info!(
        "Comparing {} with {}",
        path_first.display(),
        path_second.display()
    );

    // ── Step 2: Bind pdfium and open both documents ──────────────────────
    let pdfium = pdfium_bind::bind_pdfium()
        .map_err(|e| PdfDiffError::PdfiumBindingFailed(e.to_string()))?;

    let doc_first = PdfiumDocument::open(&pdfium, &path_first, None)?;
    let doc_second = PdfiumDocument::open(&pdfium, &path_second, None)?;

    // ── Step 3: Create the diff PDF, if requested ────────────────────────
    let sink = match output {
        Some(path) => {
            let initial = if doc_first.page_count() > 0 {
                doc_first.page_size(0)?
            } else {
                PageSize::LETTER
            };
            Some(PdfiumSink::create(&pdfium, path, initial)?)
        }
        None => None,
    };

    // ── Step 4: Compare ──────────────────────────────────────────────────
    compare_documents(&doc_first, &doc_second, sink, collect_differences, config)
}
