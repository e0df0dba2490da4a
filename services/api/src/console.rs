use clap::Args;
use persona_quiz::config::AppConfig;
use persona_quiz::error::AppError;
use persona_quiz::quiz::{
    grade, AnswerLevel, QuizDataset, QuizError, QuizSession, ResultView, TypeCatalog,
    TypeDetail, TypeId,
};
use persona_quiz::telemetry;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct TakeArgs {
    /// JSON dataset to use instead of the configured one
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct GradeArgs {
    /// Answers in question order, comma separated (each 1-5)
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub(crate) answers: Vec<i64>,
    /// JSON dataset to use instead of the configured one
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Print the result view as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ValidateArgs {
    /// JSON dataset bundle to validate
    #[arg(long, conflicts_with = "types_csv")]
    pub(crate) dataset: Option<PathBuf>,
    /// CSV type catalog to validate on its own
    #[arg(long)]
    pub(crate) types_csv: Option<PathBuf>,
}

pub(crate) fn run_take(args: TakeArgs) -> Result<(), AppError> {
    let dataset = load_dataset(args.dataset)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    take_quiz(dataset, stdin.lock(), &mut stdout)
}

pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let dataset = load_dataset(args.dataset)?;
    let outcome = grade(dataset, &args.answers)?;
    let view = ResultView::from_outcome(&outcome);
    info!(answers = args.answers.len(), "graded answer sheet");

    let mut stdout = io::stdout();
    if args.json {
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::Io(io::Error::new(io::ErrorKind::Other, err)))?;
        writeln!(stdout, "{rendered}")?;
    } else {
        render_result(&view, &mut stdout)?;
    }
    Ok(())
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let mut stdout = io::stdout();

    if let Some(path) = args.types_csv {
        let catalog = TypeCatalog::from_csv_path(&path)?;
        writeln!(stdout, "Type catalog {} is valid.", path.display())?;
        render_catalog_summary(&catalog, &mut stdout)?;
        return Ok(());
    }

    let dataset = load_dataset(args.dataset)?;
    writeln!(
        stdout,
        "Dataset is valid: {} types, {} questions.",
        dataset.catalog().len(),
        dataset.question_count()
    )?;
    render_catalog_summary(dataset.catalog(), &mut stdout)?;
    Ok(())
}

fn load_dataset(path: Option<PathBuf>) -> Result<Arc<QuizDataset>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dataset = match path {
        Some(path) => QuizDataset::from_path(path)?,
        None => config.dataset.load()?,
    };
    Ok(Arc::new(dataset))
}

/// Drive one interactive session over arbitrary input/output streams.
pub(crate) fn take_quiz<R: BufRead, W: Write>(
    dataset: Arc<QuizDataset>,
    mut input: R,
    output: &mut W,
) -> Result<(), AppError> {
    let mut session = QuizSession::new(dataset.clone());
    session.start()?;

    while let Some(prompt) = session.prompt() {
        writeln!(
            output,
            "\nQuestion {}/{} ({:.0}% complete)",
            prompt.number, prompt.total, prompt.progress_percent
        )?;
        writeln!(output, "{}", prompt.text)?;
        for level in AnswerLevel::ordered() {
            writeln!(output, "  [{}] {}", level.value(), level.label())?;
        }

        let line = read_line(&mut input, output, "> ")?;
        match line.trim().parse::<i64>() {
            Ok(value) => match session.answer(value) {
                Ok(_) => {}
                Err(QuizError::InvalidInput { .. }) => {
                    writeln!(output, "Please enter a number from 1 to 5.")?;
                }
                Err(other) => return Err(other.into()),
            },
            Err(_) => writeln!(output, "Please enter a number from 1 to 5.")?,
        }
    }

    let view = ResultView::from_outcome(&session.result()?);
    render_result(&view, output)?;

    if let ResultView::Ranked { .. } = view {
        loop {
            let line = match read_line(
                &mut input,
                output,
                "\nEnter a type id for details, or press Enter to finish: ",
            ) {
                Ok(line) => line,
                Err(AppError::Io(err)) if err.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(other) => return Err(other),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            match trimmed.parse::<u32>().ok().and_then(|id| dataset.catalog().get(TypeId(id))) {
                Some(personality) => render_detail(&TypeDetail::from(personality), output)?,
                None => writeln!(output, "No type with id '{trimmed}'.")?,
            }
        }
    }

    Ok(())
}

fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, AppError> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before the quiz finished",
        )));
    }
    Ok(line)
}

pub(crate) fn render_result<W: Write>(view: &ResultView, output: &mut W) -> io::Result<()> {
    match view {
        ResultView::Indeterminate { title, message } => {
            writeln!(output, "\n{title}")?;
            writeln!(output, "{message}")?;
        }
        ResultView::Ranked { cards } => {
            writeln!(output, "\nYour results")?;
            writeln!(output, "------------")?;
            for card in cards {
                writeln!(
                    output,
                    "{:<20} {} (#{}, score {:.1})",
                    card.category, card.name, card.type_id, card.score
                )?;
                if !card.description.is_empty() {
                    writeln!(output, "{:<20} {}", "", card.description)?;
                }
            }
        }
    }
    Ok(())
}

fn render_detail<W: Write>(detail: &TypeDetail, output: &mut W) -> io::Result<()> {
    writeln!(output, "\n{} ({})", detail.name, detail.category)?;
    if !detail.color.is_empty() {
        writeln!(output, "Color: {}", detail.color)?;
    }
    writeln!(output, "{}", detail.detail)
}

fn render_catalog_summary<W: Write>(catalog: &TypeCatalog, output: &mut W) -> io::Result<()> {
    for group in catalog.groups() {
        let names: Vec<&str> = group.members.iter().map(|t| t.name.as_str()).collect();
        writeln!(
            output,
            "  {:<20} {:>2} type(s): {}",
            group.category.as_str(),
            names.len(),
            names.join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn bundled() -> Arc<QuizDataset> {
        Arc::new(QuizDataset::bundled().expect("bundled dataset"))
    }

    #[test]
    fn take_quiz_reprompts_on_invalid_input_and_prints_results() {
        let dataset = bundled();
        let mut script = String::from("7\nabc\n");
        for _ in 0..dataset.question_count() {
            script.push_str("5\n");
        }
        script.push_str("1\n\n");

        let mut output = Vec::new();
        take_quiz(dataset.clone(), Cursor::new(script), &mut output).expect("quiz completes");

        let text = String::from_utf8(output).expect("utf8 output");
        assert_eq!(text.matches("Please enter a number from 1 to 5.").count(), 2);
        assert!(text.contains(&format!("Question 1/{}", dataset.question_count())));
        assert!(text.contains("Your results"));
        assert!(text.contains("Wolf (Animal)"));
    }

    #[test]
    fn take_quiz_reports_neutral_sessions() {
        let dataset = bundled();
        let script = "3\n".repeat(dataset.question_count());

        let mut output = Vec::new();
        take_quiz(dataset, Cursor::new(script), &mut output).expect("quiz completes");

        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.contains("We could not calculate a result."));
    }

    #[test]
    fn take_quiz_fails_when_input_ends_early() {
        let mut output = Vec::new();
        let err = take_quiz(bundled(), Cursor::new("5\n"), &mut output).expect_err("eof");
        assert!(matches!(err, AppError::Io(ref source) if source.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn detail_prompt_treats_closed_input_as_finished() {
        let dataset = bundled();
        let script = "5\n".repeat(dataset.question_count());

        let mut output = Vec::new();
        take_quiz(dataset, Cursor::new(script), &mut output).expect("quiz completes");

        let text = String::from_utf8(output).expect("utf8 output");
        assert!(text.contains("Enter a type id for details"));
    }

    /// Accepts writes until `budget` bytes are used, then fails every write.
    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.budget {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"));
            }
            self.budget -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn detail_prompt_propagates_output_failures() {
        let dataset = bundled();
        let mut script = "5\n".repeat(dataset.question_count());
        script.push_str("1\n\n");

        let mut transcript = Vec::new();
        take_quiz(dataset.clone(), Cursor::new(script.clone()), &mut transcript).expect("quiz completes");
        let results_end = String::from_utf8(transcript)
            .expect("utf8 output")
            .find("\nEnter a type id for details")
            .expect("detail prompt shown");

        let mut output = FailingWriter { budget: results_end };
        let err = take_quiz(dataset, Cursor::new(script), &mut output).expect_err("write fails");
        assert!(matches!(err, AppError::Io(ref source) if source.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn catalog_summary_lists_each_category() {
        let dataset = bundled();
        let mut output = Vec::new();
        render_catalog_summary(dataset.catalog(), &mut output).expect("renders");

        let text = String::from_utf8(output).expect("utf8 output");
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("Tool and Symbol"));
    }
}
