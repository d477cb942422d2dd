use std::collections::HashMap;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use fishbot::{Card, Game, GameEvent, Step, default_lineup, full_deck};

fn counts(game: &Game) -> HashMap<Card, usize> {
    let board = game.board();
    let mut counts = HashMap::new();
    let cards = board
        .draw_pile()
        .cards()
        .iter()
        .chain(board.discard_pile().cards())
        .chain(board.players().iter().flat_map(|p| p.hand()));
    for card in cards {
        *counts.entry(*card).or_insert(0usize) += 1;
    }
    counts
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn games_keep_every_card_and_end_cleanly(seed in any::<u64>(), players in 2usize..=4) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut builder = Game::builder().with_seed(seed);
        for (seat, bot) in default_lineup(players, &mut rng).into_iter().enumerate() {
            builder = builder.boxed_player(format!("Seat {seat}"), bot);
        }
        let mut game = builder.build().expect("lineup is valid");
        game.setup().expect("standard deck deals");
        let deck: HashMap<Card, usize> = full_deck().into_iter().map(|card| (card, 1)).collect();

        let mut steps = 0usize;
        loop {
            prop_assert_eq!(counts(&game), deck.clone());
            let board = game.board();
            prop_assert!(board.current_index() < players);
            if let Some(top) = board.discard_pile().peek_top() {
                prop_assert_eq!(board.last_deposited(), Some(top));
            }
            match game.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Finished(result)) => {
                    prop_assert!(result.players[result.winner].hand.is_empty());
                    let wins = game
                        .events()
                        .iter()
                        .filter(|event| matches!(event, GameEvent::Won { .. }))
                        .count();
                    prop_assert_eq!(wins, 1);
                    break;
                }
                Ok(Step::Aborted { turns }) => {
                    prop_assert_eq!(game.events().last(), Some(&GameEvent::Aborted { turns }));
                    break;
                }
                Err(err) => return Err(TestCaseError::fail(format!("engine error: {err}"))),
            }
            steps += 1;
            prop_assert!(steps < 20_000, "game did not terminate");
        }
        prop_assert_eq!(counts(&game), deck);
    }
}
