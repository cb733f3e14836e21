use preppro_attempt::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Assignment, AttemptResult},
    services::{AssignmentService, AttemptCommand, AttemptSnapshot, AttemptStatus},
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{} ({})", err, err.error_code());
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let state = AppState::new(Config::from_env())?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        None => list_assignments(&state).await,
        Some("practice") => practice(&state, &args[1..].join(" ")).await,
        Some("inbox") => inbox(&state, args.get(1).map(String::as_str)).await,
        Some(arg) => {
            let test_id = arg
                .parse()
                .map_err(|_| AppError::ValidationError(format!("'{}' is not a test id", arg)))?;
            take_test(&state, test_id).await
        }
    }
}

async fn list_assignments(state: &AppState) -> AppResult<()> {
    let assignments = state.assignment_service.list_assigned().await?;
    if assignments.is_empty() {
        println!("No tests assigned.");
        return Ok(());
    }

    for assignment in &assignments {
        let duration = match assignment.duration.total_seconds() {
            Some(seconds) => format_time(seconds),
            None => "untimed".to_string(),
        };
        let availability = if AssignmentService::can_start(assignment) {
            "available"
        } else {
            "closed"
        };
        println!(
            "[{}] {} ({} questions, {}, {})",
            assignment.test_id,
            assignment.title,
            assignment.question_count(),
            duration,
            availability
        );

        match state.review_service.history(assignment.test_id).await {
            Ok(attempts) => {
                for attempt in attempts.iter().take(3) {
                    println!("      previous: {}", summarize(attempt));
                }
            }
            Err(err) => log::warn!("Could not load attempts for test {}: {}", assignment.test_id, err),
        }
    }
    Ok(())
}

async fn take_test(state: &AppState, test_id: i64) -> AppResult<()> {
    let session = state.assignment_service.start(test_id).await?;
    let assignment = session.assignment().clone();
    let handle = state.run_attempt(session);
    let mut rx = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_help();
    loop {
        let snapshot = rx.borrow_and_update().clone();
        match snapshot.status {
            AttemptStatus::Graded => break,
            AttemptStatus::Submitting => {
                println!("Submitting...");
                if rx.changed().await.is_err() {
                    break;
                }
                continue;
            }
            AttemptStatus::InProgress | AttemptStatus::SubmitFailed => {}
        }

        render(&assignment, &snapshot);
        let watching = snapshot.status == AttemptStatus::InProgress && !snapshot.expired;

        tokio::select! {
            line = lines.next_line() => {
                let line = line.map_err(|e| AppError::InternalError(format!("stdin: {}", e)))?;
                let Some(line) = line else { break };
                match parse_command(&line) {
                    Some(AttemptCommand::Close) => break,
                    Some(command) => {
                        let applied = snapshot.commands_applied + 1;
                        handle.send(command).await?;
                        if rx.wait_for(|s| s.commands_applied >= applied).await.is_err() {
                            break;
                        }
                    }
                    None => print_help(),
                }
            }
            _ = async {
                let _ = rx.wait_for(|s| s.status != AttemptStatus::InProgress || s.expired).await;
            }, if watching => {}
        }
    }

    let session = handle.finish().await?;
    let Some(result) = session.result() else {
        println!("Attempt closed without a grade.");
        return Ok(());
    };

    let band = result.performance();
    println!("{}", summarize(result));
    println!("{}", band.message());

    match state.review_service.review(&session).await {
        Ok(review) => {
            for question in review.incorrect() {
                let correct = question
                    .options
                    .get(question.correct_option)
                    .map(String::as_str)
                    .unwrap_or("?");
                println!("  missed: {} (answer: {})", question.question_text, correct);
            }
            println!("Total time: {}", format_time(review.total_time_seconds()));
        }
        Err(err) => log::warn!("Review unavailable: {}", err),
    }
    Ok(())
}

async fn inbox(state: &AppState, mark_read: Option<&str>) -> AppResult<()> {
    if let Some(arg) = mark_read {
        let feedback_id = arg
            .parse()
            .map_err(|_| AppError::ValidationError(format!("'{}' is not a feedback id", arg)))?;
        state.review_service.mark_feedback_read(feedback_id).await?;
    }

    let inbox = state.review_service.feedback_inbox().await?;
    if inbox.is_empty() {
        println!("No feedback available yet.");
        return Ok(());
    }
    for feedback in &inbox {
        let score = feedback
            .score
            .map(|s| format!("{:.0}%", s))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}[{}] {} ({}) from {}",
            if feedback.is_read { " " } else { "*" },
            feedback.id,
            feedback.test_title,
            score,
            feedback.teacher_name
        );
        println!("      {}", feedback.feedback_text);
    }
    Ok(())
}

async fn practice(state: &AppState, text: &str) -> AppResult<()> {
    let session = state.practice_service.create_and_wait(text).await?;

    if let Some(points) = &session.summary_points {
        println!("Summary:");
        for point in points {
            println!("  - {}", point);
        }
    }
    for (i, question) in session.questions().iter().enumerate() {
        println!("{}. {}", i + 1, question.question_text);
        for (j, option) in question.options.iter().enumerate() {
            println!("   {}) {}", j, option);
        }
    }
    Ok(())
}

fn render(assignment: &Assignment, snapshot: &AttemptSnapshot) {
    let Some(question) = assignment.questions.get(snapshot.current_index) else {
        return;
    };

    println!();
    println!(
        "Question {}/{}{}",
        snapshot.current_index + 1,
        snapshot.question_count,
        if snapshot.current_flagged { " [flagged]" } else { "" }
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        let mark = if snapshot.current_selection == Some(i) { "x" } else { " " };
        println!("  [{}] {}. {}", mark, i, option);
    }
    if let Some(remaining) = snapshot.remaining_seconds {
        println!("Time left: {}", format_time(remaining));
    }
    if snapshot.expired {
        println!("Time is up.");
    }
    if let Some(err) = &snapshot.last_error {
        println!("! {}", err);
    }
}

fn parse_command(line: &str) -> Option<AttemptCommand> {
    let line = line.trim();
    if let Ok(option) = line.parse::<usize>() {
        return Some(AttemptCommand::SelectOption(option));
    }
    match line {
        "n" => Some(AttemptCommand::Next),
        "p" => Some(AttemptCommand::Previous),
        "f" => Some(AttemptCommand::ToggleFlag),
        "s" => Some(AttemptCommand::Submit),
        "q" => Some(AttemptCommand::Close),
        _ => None,
    }
}

fn print_help() {
    println!("<number> select option, n next, p previous, f flag, s submit, q quit");
}

fn summarize(result: &AttemptResult) -> String {
    format!(
        "{}/{} ({:.0}%) {}",
        result.score,
        result.total_questions,
        result.percentage(),
        if result.passed { "passed" } else { "not passed" }
    )
}

fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
