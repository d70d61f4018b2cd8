//! Simulated practice session.
//!
//! Run with: `cargo run --example session -- [problem_type] [seed]`
//!
//! Plays one full session for a skill (default `fraction_comparison`, seed 7)
//! with a simulated student who gets most problems right. Every problem is
//! printed as the student would see it, followed by the adaptation decision
//! at each group boundary.
//!
//! Set `RUST_LOG=numbersense_engine=debug` to also see the engine's own
//! tracing output.

use numbersense_engine::{
    adapt_after_group, check_answer, compute_visual_trend, generate, get_session_config,
    GenerationConfig, ProblemType, SessionState,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

/// Probability that the simulated student answers correctly.
const SKILL: f64 = 0.8;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let tag = args.next().unwrap_or_else(|| "fraction_comparison".to_string());
    let problem_type = match tag.parse::<ProblemType>() {
        Ok(ty) => ty,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("known types: {}", ProblemType::ALL.map(|t| t.tag()).join(", "));
            std::process::exit(2);
        }
    };
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);

    let mut rng = StdRng::seed_from_u64(seed);
    let session = get_session_config(problem_type.tag());
    let mut state = SessionState::starting(true);
    let mut config = GenerationConfig::default();
    let mut visual_history = vec![state.visual_support_level];
    let (mut correctness, mut times): (Vec<bool>, Vec<u32>) = (Vec::new(), Vec::new());

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  {problem_type} ({})  {} problems in groups of {}  seed {seed}",
        problem_type.domain(),
        session.session_total,
        session.group_size
    );
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for seq in 1..=session.session_total {
        let problem = generate(&mut rng, problem_type, state.difficulty_level, &config);
        if let Some((a, b)) = problem.fact_pair() {
            config.seen_facts.insert(a, b);
        }

        let view = problem.display_view(state.shows_visuals());
        println!(
            "\n  #{seq:>2} [group {} | difficulty {} | visuals {}]",
            session.group_number(seq),
            state.difficulty_level,
            state.visual_support_level
        );
        println!("      {}", problem.prompt);
        if let Some(choices) = &problem.choices {
            println!("      choices: {}", choices.join("  "));
        }
        if let Some(hint) = view.get("visual_hint") {
            println!("      visual:  {hint}");
        }

        let answer = if rng.gen_bool(SKILL) {
            problem.correct_answer.clone()
        } else {
            "?".to_string()
        };
        let feedback = check_answer(&problem, &answer);
        let mark = if feedback.is_correct { "✓" } else { "✗" };
        println!("      {mark} {}", feedback.correction.as_deref().unwrap_or("correct"));
        println!("        {}", feedback.explanation);

        correctness.push(feedback.is_correct);
        times.push(rng.gen_range(4_000..18_000));

        if session.is_group_boundary(seq) {
            let decision = adapt_after_group(
                &correctness,
                &times,
                state.difficulty_level,
                state.visual_support_level,
                5,
            );
            println!("\n  ▶ {}", decision.reason);
            state.apply(&decision);
            visual_history.push(state.visual_support_level);
            correctness.clear();
            times.clear();
        }
    }

    let trend = compute_visual_trend(&visual_history);
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  final: difficulty {}  visuals {}",
        state.difficulty_level, state.visual_support_level
    );
    println!("  visual trend: {trend}");
}
