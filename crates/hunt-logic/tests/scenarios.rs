use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use hunt_logic::{
    Alternator, AntiSocial, BonusThreshold, Choice, Detective, EndReason, FairHunter,
    ForecastInterval, Freeloader, PlayerEntry, Pushover, RandomHunter, RoundContext, RoundStatus,
    SeededRng, Strategy, Tournament, TournamentConfig, Verdict,
};

#[derive(Clone, Default)]
struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn config(
    min_rounds: u32,
    average_rounds: u32,
    bonus_threshold: BonusThreshold,
) -> TournamentConfig {
    TournamentConfig {
        min_rounds,
        average_rounds,
        end_early: false,
        verbose: true,
        seed: SeededRng::seed_from_u64(2024),
        bonus_threshold,
    }
}

fn food_of(tournament: &Tournament, prefix: &str) -> i64 {
    tournament
        .players()
        .iter()
        .find(|p| p.id().uid().starts_with(prefix))
        .map(|p| p.food())
        .unwrap()
}

#[test]
fn pushover_pays_freeloader_every_round() {
    let entries = vec![PlayerEntry::new(Pushover), PlayerEntry::new(Freeloader)];
    let mut tournament =
        Tournament::new(entries, config(5, 1000, BonusThreshold::Fixed(u64::MAX)), None).unwrap();

    for round in 1..=5 {
        tournament.play_round().unwrap();
        assert_eq!(food_of(&tournament, "Pushover"), 300 - 3 * round);
        assert_eq!(food_of(&tournament, "Freeloader"), 300 + round);
    }
    assert_eq!(food_of(&tournament, "Pushover"), 285);
    assert_eq!(food_of(&tournament, "Freeloader"), 305);
}

#[test]
fn pushover_starves_against_freeloader() {
    let entries = vec![PlayerEntry::new(Pushover), PlayerEntry::new(Freeloader)];
    let report = Tournament::new(entries, config(200, 1000, BonusThreshold::Fixed(u64::MAX)), None)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(report.rounds_played, 100);
    assert_eq!(report.end_reason, Some(EndReason::TooFewPlayers));
    assert_eq!(report.eliminations[0].uid, "Pushover");
    assert_eq!(report.verdict, Verdict::Winner("Freeloader".to_string()));
    assert_eq!(report.survivors[0].food, 400);
}

#[test]
fn cooperating_pushovers_run_to_round_limit() {
    let entries = (0..3).map(|i| PlayerEntry::new(Pushover).with_id(i)).collect();
    let tournament =
        Tournament::new(entries, config(20, 60, BonusThreshold::Fixed(u64::MAX)), None).unwrap();
    let max_rounds = tournament.max_rounds();
    let report = tournament.run().unwrap();

    // the game ends once the round number exceeds the limit
    assert_eq!(report.rounds_played, max_rounds + 1);
    assert_eq!(report.end_reason, Some(EndReason::RoundLimit));
    assert!(report.eliminations.is_empty());
    assert_eq!(report.survivors.len(), 3);
    for standing in &report.survivors {
        assert_eq!(standing.food, 600);
        assert_eq!(standing.reputation, 1.0);
    }
    assert!(matches!(report.verdict, Verdict::Tie(ref uids) if uids.len() == 3));
}

#[test]
fn detective_tracks_freeloader_through_wide_forecasts() {
    let mut detective = Detective::generous_tit_for_tat(1.0, 1.0, 0.0, 0.0).unwrap();
    let mut rng = SeededRng::new(&[1u8; 32], 0);
    let ctx = |round| RoundContext {
        round,
        food: 300,
        reputation: 0.0,
        threshold: u64::MAX,
        logging: false,
    };

    // round 1: no contests yet
    assert_eq!(detective.choose_all(&ctx(1), &[0.0], &mut rng), vec![Choice::Hunt]);
    assert_eq!(detective.book().records()[0].interval, ForecastInterval::UNBOUNDED);
    detective.on_outcomes(&[-3]);

    // round 2: freeloader still at zero, recognised from the wide interval
    assert_eq!(detective.choose_all(&ctx(2), &[0.0], &mut rng), vec![Choice::Slack]);
    assert_eq!(detective.book().records()[0].interval, ForecastInterval::UNBOUNDED);
    detective.on_outcomes(&[-2]);

    assert_eq!(detective.choose_all(&ctx(3), &[0.0], &mut rng), vec![Choice::Slack]);
    assert_eq!(detective.book().records()[0].interval, ForecastInterval::UNBOUNDED);
    assert_eq!(detective.book().contests_so_far(), 3);
}

#[test]
fn detective_retaliates_against_freeloader_in_play() {
    // unrecognised opponents would be hunted with; recognised slackers are not
    let detective = Detective::generous_tit_for_tat(1.0, 1.0, 0.0, 0.0).unwrap();
    let entries = vec![PlayerEntry::new(detective), PlayerEntry::new(Freeloader)];
    let mut tournament =
        Tournament::new(entries, config(10, 20, BonusThreshold::Fixed(u64::MAX)), None).unwrap();

    for _ in 0..3 {
        tournament.play_round().unwrap();
    }
    assert_eq!(food_of(&tournament, "RASGeT"), 300 - 3 - 2 - 2);
    assert_eq!(food_of(&tournament, "Freeloader"), 300 + 1 - 2 - 2);
}

#[test]
fn detective_tells_pushover_from_freeloader() {
    let detective = Detective::generous_tit_for_tat(0.0, 1.0, 0.0, 0.0).unwrap();
    let entries = vec![
        PlayerEntry::new(detective),
        PlayerEntry::new(Pushover),
        PlayerEntry::new(Freeloader),
    ];
    let mut tournament =
        Tournament::new(entries, config(10, 20, BonusThreshold::Fixed(u64::MAX)), None).unwrap();

    for _ in 0..3 {
        tournament.play_round().unwrap();
    }

    // round 1 hunts both (-3), round 2 nobody is known yet (+1 - 2),
    // round 3 hunts the pushover and slacks the freeloader (0 - 2)
    let detective = tournament
        .players()
        .iter()
        .find(|p| p.id().uid().starts_with("RASGeT"))
        .unwrap();
    assert_eq!(detective.food(), 600 - 3 - 1 - 2);
    assert_eq!(detective.ledger().hunts(), 3);
    assert_eq!(detective.ledger().opportunities(), 6);
}

#[test]
fn ledgers_stay_consistent_through_a_noisy_game() {
    let entries = vec![
        PlayerEntry::new(RandomHunter::new(0.3).unwrap()),
        PlayerEntry::new(RandomHunter::new(0.8).unwrap()),
        PlayerEntry::new(FairHunter),
        PlayerEntry::new(Alternator::default()),
        PlayerEntry::new(AntiSocial::random(0.6, 0.9, 0.2).unwrap()),
        PlayerEntry::new(Detective::pavlov(0.5, 0.8, 0.2).unwrap()),
    ];
    let mut tournament =
        Tournament::new(entries, config(50, 80, BonusThreshold::Random), None).unwrap();

    let mut last_opportunities = 0;
    loop {
        let status = tournament.play_round().unwrap();
        for player in tournament.players() {
            let ledger = player.ledger();
            assert!(ledger.hunts() <= ledger.opportunities());
            assert!(ledger.opportunities() >= last_opportunities);
            assert!((0.0..=1.0).contains(&player.reputation()));
        }
        last_opportunities = tournament
            .players()
            .iter()
            .map(|p| p.ledger().opportunities())
            .min()
            .unwrap_or(last_opportunities);
        if let Some(summary) = tournament.last_round() {
            assert!(summary.threshold >= 1);
        }
        if status != RoundStatus::Continue {
            break;
        }
    }
    assert!(tournament.is_finished());
}

#[test]
fn same_seed_same_transcript() {
    let run = || {
        let capture = Capture::default();
        let entries = vec![
            PlayerEntry::new(RandomHunter::new(0.5).unwrap()),
            PlayerEntry::new(FairHunter),
            PlayerEntry::new(Detective::guarded_pavlov(0.5, 0.9, 0.1).unwrap()),
        ];
        let report = Tournament::new(
            entries,
            config(30, 60, BonusThreshold::Random),
            Some(Box::new(capture.clone())),
        )
        .unwrap()
        .run()
        .unwrap();
        (report.rounds_played, report.survivors, capture.text())
    };

    let (rounds_a, survivors_a, text_a) = run();
    let (rounds_b, survivors_b, text_b) = run();
    assert_eq!(rounds_a, rounds_b);
    assert_eq!(survivors_a, survivors_b);
    assert_eq!(text_a, text_b);
    assert!(text_a.contains("Begin Round 1:"));
}

struct Babbler;

impl Strategy for Babbler {
    fn name(&self) -> String {
        "Babbler".to_string()
    }

    fn choose_all(
        &mut self,
        _: &RoundContext,
        opponents: &[f64],
        _: &mut SeededRng,
    ) -> Vec<Choice> {
        vec![Choice::Hunt; opponents.len() + 1]
    }
}

#[test]
fn malformed_choices_abort_the_game() {
    let entries = vec![PlayerEntry::new(Pushover), PlayerEntry::new(Babbler)];
    let mut tournament =
        Tournament::new(entries, config(5, 10, BonusThreshold::Random), None).unwrap();
    let err = tournament.play_round().unwrap_err();
    assert_eq!(
        err.to_string(),
        "strategy for Babbler returned 2 choices for 1 opponents"
    );
    assert!(tournament.is_finished());
    assert!(tournament.play_round().is_err());
}
