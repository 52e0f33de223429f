//! Collects questions from mixed documents, sorts them by pinyin, and
//! writes the sorted bank as Word, Excel, and plain text.
//!
//! The pipeline is synchronous and reports progress only through the
//! [`LogSink`] it is given, so it can run on a worker thread while a
//! foreground loop drains the log.

pub mod aggregate;
pub mod options;
pub mod report;

pub use aggregate::Aggregator;
pub use options::ProcessOptions;
pub use report::SaveReport;

use qbank_core::{sort_records, LogSink, OutputFormat, Record, Renderer, TextRenderer};
use qbank_docx::DocxRenderer;
use qbank_xlsx::XlsxRenderer;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Run the whole pipeline with default options.
///
/// Every output format is attempted regardless of the others; the report
/// says which ones were written.
pub fn process<P: AsRef<Path>>(paths: &[P], output_base: &Path, sink: &dyn LogSink) -> SaveReport {
    process_with_options(paths, output_base, &ProcessOptions::default(), sink)
}

/// Run the whole pipeline.
pub fn process_with_options<P: AsRef<Path>>(
    paths: &[P],
    output_base: &Path,
    options: &ProcessOptions,
    sink: &dyn LogSink,
) -> SaveReport {
    let records = collect_sorted(paths, sink);
    save_all(&records, output_base, options, sink)
}

/// Collect records from every file, in order, then stable-sort them.
pub fn collect_sorted<P: AsRef<Path>>(paths: &[P], sink: &dyn LogSink) -> Vec<Record> {
    let mut records = Aggregator::new().collect(paths, sink);

    sink.append("Sorting questions by pinyin...");
    sort_records(&mut records);
    sink.append(&format!("Sorting complete, {} questions total", records.len()));

    records
}

/// Write an already-sorted collection in every output format.
pub fn save_all(
    records: &[Record],
    output_base: &Path,
    options: &ProcessOptions,
    sink: &dyn LogSink,
) -> SaveReport {
    let docx = DocxRenderer::new().with_title(options.title.clone());
    let xlsx = XlsxRenderer::new().with_sheet_name(options.sheet_name.clone());
    let text = TextRenderer::new();
    let renderers: [&dyn Renderer; 3] = [&docx, &xlsx, &text];

    let mut report = SaveReport::new(records.len());

    for renderer in renderers {
        let format = renderer.format();
        let path = output_path(output_base, format);
        sink.append(&format!("Creating {} file...", format));

        let saved = match renderer.render_to(records, &path, sink) {
            Ok(()) => {
                sink.append(&format!("{} file saved to {}", format, path.display()));
                true
            }
            Err(e) => {
                log::warn!("Failed to save {}: {}", path.display(), e);
                sink.append(&format!("Error saving {} file: {}", format, e));
                false
            }
        };
        report.record(format, path, saved);
    }

    if report.all_succeeded() {
        sink.append("All files saved successfully!");
    } else {
        sink.append(&format!(
            "Some files failed to save: {}/{} succeeded",
            report.success_count(),
            OutputFormat::ALL.len()
        ));
    }

    report
}

/// `<base>.<ext>` for the given format.
pub fn output_path(base: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_core::{MemorySink, SortKey};
    use qbank_docx::DocxReader;
    use std::fs;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_output_path_appends_extension() {
        let base = Path::new("/tmp/out/bank.v2");
        assert_eq!(
            output_path(base, OutputFormat::Word),
            PathBuf::from("/tmp/out/bank.v2.docx")
        );
        assert_eq!(
            output_path(base, OutputFormat::Text),
            PathBuf::from("/tmp/out/bank.v2.txt")
        );
    }

    #[test]
    fn test_end_to_end_three_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "bank.txt",
            "1. 苹果 答案：A\n2. apple without marker\n3. 香蕉 答案：B\n",
        );
        let base = dir.path().join("sorted");
        let sink = MemorySink::new();

        let report = process(&[input], &base, &sink);

        assert!(report.all_succeeded());
        assert_eq!(report.record_count, 3);
        for format in OutputFormat::ALL {
            assert!(output_path(&base, format).exists());
        }

        let text = fs::read_to_string(output_path(&base, OutputFormat::Text)).unwrap();
        let ping = text.find("1. 苹果 答案：A").unwrap();
        let xiang = text.find("2. 香蕉 答案：B").unwrap();
        let apple = text.find("3. apple without marker").unwrap();
        assert!(ping < xiang && xiang < apple);
        assert_eq!(text.matches(" 部分\n").count(), 3);

        let docx = DocxReader::new()
            .read_path(&output_path(&base, OutputFormat::Word))
            .unwrap();
        assert!(docx.contains("P 部分\n1. 苹果 答案：A\n答案: A"));
        assert!(docx.contains("Z 部分\n3. apple without marker"));

        let lines = sink.lines();
        assert!(lines.iter().any(|l| l == "All files saved successfully!"));
    }

    #[test]
    fn test_collect_sorted_is_stable_across_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = write(dir.path(), "a.txt", "1. 苹果一\n2. 香蕉一\n");
        let second = write(dir.path(), "b.txt", "1. 香蕉二\n2. 苹果二\n");
        let sink = MemorySink::new();

        let records = collect_sorted(&[first, second], &sink);

        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["苹果一", "苹果二", "香蕉一", "香蕉二"]);
    }

    #[test]
    fn test_collect_sorted_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "bank.txt",
            "说明\n1. 中国 标准答案：C\n2. 安全 答案：正确\n3. zebra\n4、北京",
        );
        let sink = MemorySink::new();

        let first = collect_sorted(&[&input], &sink);
        let second = collect_sorted(&[&input], &sink);

        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert_eq!(first.last().unwrap().sort_key, SortKey::Unread);
    }

    #[test]
    fn test_failed_outputs_are_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bank.txt", "1. 苹果\n");
        let base = dir.path().join("missing-dir").join("sorted");
        let sink = MemorySink::new();

        let report = process(&[input], &base, &sink);

        assert_eq!(report.success_count(), 0);
        assert!(!report.any_succeeded());
        assert_eq!(report.succeeded(OutputFormat::Excel), Some(false));
        assert!(sink
            .lines()
            .iter()
            .any(|l| l == "Some files failed to save: 0/3 succeeded"));
    }

    #[test]
    fn test_one_failed_format_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bank.txt", "1. 苹果\n");
        let base = dir.path().join("sorted");
        // A directory where the Word file should go makes only that write fail.
        fs::create_dir(output_path(&base, OutputFormat::Word)).unwrap();
        let sink = MemorySink::new();

        let report = process(&[input], &base, &sink);

        assert_eq!(report.succeeded(OutputFormat::Word), Some(false));
        assert_eq!(report.succeeded(OutputFormat::Excel), Some(true));
        assert_eq!(report.succeeded(OutputFormat::Text), Some(true));
        assert_eq!(report.success_count(), 2);
    }

    #[test]
    fn test_empty_input_still_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("empty");
        let sink = MemorySink::new();

        let report = process::<PathBuf>(&[], &base, &sink);

        assert!(report.all_succeeded());
        assert_eq!(report.record_count, 0);
    }

    #[test]
    fn test_custom_title() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bank.txt", "1. 苹果\n");
        let base = dir.path().join("titled");
        let sink = MemorySink::new();
        let options = ProcessOptions::new().with_title("期末复习");

        let report = process_with_options(&[input], &base, &options, &sink);
        assert!(report.all_succeeded());

        let docx = DocxReader::new()
            .read_path(&output_path(&base, OutputFormat::Word))
            .unwrap();
        assert!(docx.starts_with("期末复习\n"));
    }

    #[test]
    fn test_save_phase_progress_reaches_sink() {
        let dir = tempfile::tempdir().unwrap();
        let content: String = (1..=120).map(|i| format!("{}. 苹果题\n", i)).collect();
        let input = write(dir.path(), "bank.txt", &content);
        let base = dir.path().join("sorted");
        let sink = MemorySink::new();

        let report = process(&[input], &base, &sink);
        assert_eq!(report.record_count, 120);

        let lines = sink.lines();
        let word = lines.iter().position(|l| l == "Creating Word file...").unwrap();
        let progress = lines.iter().position(|l| l == "Processed 100/120 questions").unwrap();
        let saved = lines.iter().position(|l| l.starts_with("Word file saved to")).unwrap();
        assert!(word < progress && progress < saved);
        assert!(lines.iter().any(|l| l == "Wrote 100/120 rows"));
        assert!(lines.iter().any(|l| l == "Wrote 100/120 questions"));
    }
}
