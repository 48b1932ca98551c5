use std::error::Error;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use services::judge;
use services::leaderboard;
use services::{AppServices, SessionManager, TutorError, TutorGates, TutorRequest, TutorService};
use studio_core::model::{NotificationPreferences, Problem, ProblemId};
use studio_core::progress::StepStatus;

use crate::cli::{Command, NotificationKind};

const LEADERBOARD_SIZE: usize = 50;

#[derive(Debug)]
pub enum CommandError {
    NotSignedIn,
    UnknownCourse(String),
    UnknownLesson { course: String, lesson: String },
    UnknownPath(String),
    UnknownProblem(ProblemId),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotSignedIn => write!(f, "not signed in (run `studio login` first)"),
            CommandError::UnknownCourse(id) => write!(f, "unknown course: {id}"),
            CommandError::UnknownLesson { course, lesson } => {
                write!(f, "unknown lesson {lesson} in course {course}")
            }
            CommandError::UnknownPath(id) => write!(f, "unknown learning path: {id}"),
            CommandError::UnknownProblem(id) => write!(f, "unknown problem: {id}"),
        }
    }
}

impl Error for CommandError {}

pub async fn execute(app: &mut AppServices, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Login {
            name,
            email,
            token,
            photo,
        } => {
            let session = app.session_mut();
            session
                .login(&name, &email, &token, photo.as_deref())
                .await?;
            if let Some(identity) = session.current_identity() {
                println!("Signed in as {} ({})", identity.name(), identity.initials());
            }
        }
        Command::Logout => {
            app.session_mut().logout().await?;
            println!("Signed out.");
        }
        Command::Whoami => whoami(app.session()),
        Command::Progress { course } => {
            let session = signed_in(app.session())?;
            print_progress(session, course.as_deref())?;
        }
        Command::ToggleLesson { course, lesson } => {
            let catalog = app.catalog();
            let known = catalog
                .course(&course)
                .ok_or_else(|| CommandError::UnknownCourse(course.clone()))?;
            if known.lesson(&lesson).is_none() {
                return Err(CommandError::UnknownLesson { course, lesson }.into());
            }
            let session = signed_in_mut(app.session_mut())?;
            let progress = session.progress_mut();
            progress.toggle_lesson_complete(&course, &lesson).await?;
            let mark = if progress.is_lesson_complete(&course, &lesson) {
                "complete"
            } else {
                "not complete"
            };
            println!(
                "{course}/{lesson} is now {mark} ({}%)",
                progress.course_progress(&course)
            );
        }
        Command::Complete { course } => {
            if app.catalog().course(&course).is_none() {
                return Err(CommandError::UnknownCourse(course).into());
            }
            let session = signed_in_mut(app.session_mut())?;
            session.progress_mut().complete_course(&course).await?;
            println!("{course} marked complete.");
        }
        Command::Profile { name, bio, photo } => {
            let session = signed_in_mut(app.session_mut())?;
            session.update_profile(&name, &bio, photo.as_deref()).await?;
            println!("Profile updated.");
        }
        Command::Notify { change } => {
            let session = signed_in_mut(app.session_mut())?;
            let progress = session.progress_mut();
            if let Some((kind, enabled)) = change {
                let mut prefs = progress.notification_preferences();
                match kind {
                    NotificationKind::NewLessons => prefs.new_lessons = enabled,
                    NotificationKind::ProgressReport => prefs.progress_report = enabled,
                    NotificationKind::CommunityActivity => prefs.community_activity = enabled,
                }
                progress.update_notification_preferences(prefs).await?;
            }
            print_notifications(progress.notification_preferences());
        }
        Command::Badges => {
            let session = signed_in(app.session())?;
            let badges = session.progress().badges();
            if badges.is_empty() {
                println!("No badges yet. Complete a course to earn one.");
            }
            for course in badges {
                println!("* {}", course.title());
            }
        }
        Command::Roadmap { path } => {
            let session = signed_in(app.session())?;
            let catalog = session.progress().catalog();
            let learning_path = catalog
                .path(&path)
                .ok_or_else(|| CommandError::UnknownPath(path.clone()))?;
            let roadmap = session
                .progress()
                .roadmap(&path)
                .ok_or(CommandError::UnknownPath(path))?;
            println!(
                "{} ({}/{} steps complete)",
                learning_path.title(),
                roadmap.completed,
                roadmap.total
            );
            for step in &roadmap.steps {
                let mark = match step.status {
                    StepStatus::Completed => "[x]",
                    StepStatus::Current => "[>]",
                    StepStatus::Locked => "[ ]",
                };
                println!("  {mark} {}. {}", step.number, step.step.title());
            }
        }
        Command::Problems(query) => {
            let catalog = app.catalog();
            for problem in catalog.find_problems(&query) {
                println!(
                    "{:>3}  {:<6}  {:<10}  {}",
                    problem.id,
                    problem.difficulty,
                    problem.language,
                    problem.title
                );
            }
        }
        Command::Run { problem } => {
            let catalog = app.catalog();
            let problem = find_problem(&catalog, problem)?;
            print_lines(&judge::run_examples(problem).lines);
        }
        Command::Submit { problem, code_file } => {
            let catalog = app.catalog();
            find_problem(&catalog, problem)?;
            let code = std::fs::read_to_string(code_file)?;
            print_lines(&judge::submit(&code).lines);
        }
        Command::Ask { course, question } => {
            let catalog = app.catalog();
            let topic = catalog
                .course(&course)
                .ok_or(CommandError::UnknownCourse(course))?
                .title()
                .to_string();
            let request = TutorRequest::AskTutor { topic, question };
            consult(&app.tutor(), &app.tutor_gates(), request).await?;
        }
        Command::Hint { problem, code_file } => {
            let catalog = app.catalog();
            let problem = find_problem(&catalog, problem)?;
            let user_code = match code_file {
                Some(path) => std::fs::read_to_string(path)?,
                None => problem.template_code.clone(),
            };
            let request = TutorRequest::ProblemHint {
                title: problem.title.clone(),
                statement: problem.statement.clone(),
                user_code,
            };
            consult(&app.tutor(), &app.tutor_gates(), request).await?;
        }
        Command::Explain { problem } => {
            let catalog = app.catalog();
            let problem = find_problem(&catalog, problem)?;
            let request = TutorRequest::ExplainSolution {
                title: problem.title.clone(),
                solution_code: problem.solution.code.clone(),
            };
            consult(&app.tutor(), &app.tutor_gates(), request).await?;
        }
        Command::Leaderboard { timeframe, seed } => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let mut rng = StdRng::seed_from_u64(seed);
            let base = leaderboard::generate(LEADERBOARD_SIZE, &mut rng);
            let rows = leaderboard::reshuffle(&base, timeframe, &mut rng);

            println!("Leaderboard ({})", timeframe.as_str());
            for row in &rows {
                println!(
                    "{:>3}. {:<2} {:<18} {:<14} {:>4} solved {:>3}% {:>3}d {:>5} pts",
                    row.rank,
                    row.initials,
                    row.name,
                    row.username,
                    row.problems_solved,
                    row.accuracy,
                    row.streak_days,
                    row.points
                );
            }
            if let Some(identity) = app.session().current_identity() {
                let you = leaderboard::current_user_entry(identity);
                println!(
                    "You: #{} {} {} solved {} pts",
                    you.rank, you.username, you.problems_solved, you.points
                );
            }
        }
    }
    Ok(())
}

fn signed_in(session: &SessionManager) -> Result<&SessionManager, CommandError> {
    if session.is_authenticated() {
        Ok(session)
    } else {
        Err(CommandError::NotSignedIn)
    }
}

fn signed_in_mut(session: &mut SessionManager) -> Result<&mut SessionManager, CommandError> {
    if session.is_authenticated() {
        Ok(session)
    } else {
        Err(CommandError::NotSignedIn)
    }
}

fn find_problem(
    catalog: &studio_core::Catalog,
    id: ProblemId,
) -> Result<&Problem, CommandError> {
    catalog.problem(id).ok_or(CommandError::UnknownProblem(id))
}

fn whoami(session: &SessionManager) {
    let Some(identity) = session.current_identity() else {
        println!("Not signed in.");
        return;
    };
    println!("{} <{}>", identity.name(), identity.email());
    println!("initials: {}", identity.initials());
    if let Some(photo) = identity.photo_url() {
        println!("photo:    {photo}");
    }
    if let Some(bio) = identity.bio() {
        println!("bio:      {bio}");
    }
}

fn print_progress(session: &SessionManager, course: Option<&str>) -> Result<(), CommandError> {
    let progress = session.progress();
    let catalog = progress.catalog();

    let Some(course_id) = course else {
        for course in catalog.courses() {
            let done = if progress.is_course_completed(course.id().as_str()) {
                " (completed)"
            } else {
                ""
            };
            println!(
                "{:>3}%  {:<22} {}{done}",
                progress.course_progress(course.id().as_str()),
                course.id(),
                course.title()
            );
        }
        return Ok(());
    };

    let course = catalog
        .course(course_id)
        .ok_or_else(|| CommandError::UnknownCourse(course_id.to_string()))?;
    println!(
        "{} ({}%)",
        course.title(),
        progress.course_progress(course_id)
    );
    for lesson in course.lessons() {
        let mark = if progress.is_lesson_complete(course_id, lesson.id().as_str()) {
            "[x]"
        } else {
            "[ ]"
        };
        println!(
            "  {mark} {:<4} {} ({} min)",
            lesson.id(),
            lesson.title(),
            lesson.duration_minutes()
        );
    }
    Ok(())
}

fn print_notifications(prefs: NotificationPreferences) {
    let show = |on: bool| if on { "on" } else { "off" };
    println!("new-lessons:        {}", show(prefs.new_lessons));
    println!("progress-report:    {}", show(prefs.progress_report));
    println!("community-activity: {}", show(prefs.community_activity));
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Send one tutor request through its control's gate; failures print the
/// fixed message for that request.
///
/// Returns `false` when the control already has a request in flight.
async fn consult(
    tutor: &TutorService,
    gates: &TutorGates,
    request: TutorRequest,
) -> Result<bool, Box<dyn Error>> {
    let Some(_guard) = gates.for_request(&request).try_begin() else {
        eprintln!("{} request already in progress", request.kind());
        return Ok(false);
    };
    match tutor.send(&request).await {
        Ok(text) => println!("{text}"),
        Err(TutorError::EmptyQuestion) => return Err(TutorError::EmptyQuestion.into()),
        Err(TutorError::Disabled) => {
            println!("{}", request.failure_message());
            eprintln!("hint: set STUDIO_AI_API_KEY to enable the AI tutor");
        }
        Err(_) => println!("{}", request.failure_message()),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn explain_request() -> TutorRequest {
        TutorRequest::ExplainSolution {
            title: "Two Sum".into(),
            solution_code: "return []".into(),
        }
    }

    #[tokio::test]
    async fn consult_skips_a_control_that_is_busy() {
        let tutor = TutorService::new(None);
        let gates = TutorGates::new();

        let held = gates.for_request(&explain_request()).try_begin();
        assert!(held.is_some());
        assert!(gates.for_request(&explain_request()).try_begin().is_none());
        assert!(!consult(&tutor, &gates, explain_request()).await.unwrap());

        drop(held);
        assert!(consult(&tutor, &gates, explain_request()).await.unwrap());
        assert!(!gates.for_request(&explain_request()).is_busy());
    }

    #[tokio::test]
    async fn consult_rejects_a_blank_question() {
        let tutor = TutorService::new(None);
        let gates = TutorGates::new();
        let request = TutorRequest::AskTutor {
            topic: "Rust".into(),
            question: "  ".into(),
        };
        assert!(consult(&tutor, &gates, request).await.is_err());
    }
}
