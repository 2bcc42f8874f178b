//! Encode/decode walks without engine filters.

use proptest::prelude::*;
use stegachess::notation::parse_san;
use stegachess::{
    Framing, ForcedMovePolicy, GameAssembler, MoveSequence, Position, StegoConfig, StegoError,
};

const ITALIAN: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

/// White is in check and Nb1 is the only legal reply
const FORCED: &str = "7k/8/8/8/8/N7/PP6/K6r w - - 0 1";

fn assembler(config: StegoConfig) -> GameAssembler {
    GameAssembler::new(config).unwrap()
}

fn play(start: &Position, sans: &[&str]) -> (Position, Vec<stegachess::types::Move>) {
    let mut pos = *start;
    let mut moves = Vec::new();
    for san in sans {
        let mv = parse_san(pos.board(), san).unwrap();
        pos = pos.play(mv);
        moves.push(mv);
    }
    (pos, moves)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_roundtrip_length_prefixed(payload in prop::collection::vec(any::<u8>(), 0..24)) {
        let a = assembler(StegoConfig::default());
        let game = a.encode(&payload).unwrap();
        prop_assert_eq!(a.decode(&game).unwrap(), payload.clone());
        prop_assert_eq!(a.decode_pgn(&game.to_pgn()).unwrap(), payload);
    }

    #[test]
    fn prop_roundtrip_bare(payload in prop::collection::vec(any::<u8>(), 0..16)) {
        let a = assembler(StegoConfig { framing: Framing::Bare, ..Default::default() });
        let game = a.encode(&payload).unwrap();
        // Bare framing cannot carry trailing zero bytes
        let mut expected = payload.clone();
        while expected.last() == Some(&0) {
            expected.pop();
        }
        prop_assert_eq!(a.decode(&game).unwrap(), expected);
    }
}

#[test]
fn test_deterministic() {
    let a = assembler(StegoConfig::default());
    let first = a.encode(b"same bytes, same game").unwrap();
    let second = a.encode(b"same bytes, same game").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_pgn(), second.to_pgn());
}

#[test]
fn test_non_initial_start() {
    let config = StegoConfig {
        start_fen: Some(ITALIAN.into()),
        ..Default::default()
    };
    let a = assembler(config);
    let game = a.encode(b"from the middlegame").unwrap();
    let pgn = game.to_pgn();
    assert!(pgn.contains("[SetUp \"1\"]"));
    assert!(pgn.contains(ITALIAN));
    assert_eq!(a.decode_pgn(&pgn).unwrap(), b"from the middlegame");

    let from_start = assembler(StegoConfig::default())
        .encode(b"from the middlegame")
        .unwrap();
    assert_ne!(from_start.sans(), game.sans());
}

#[test]
fn test_start_from_black() {
    let a = assembler(StegoConfig {
        start_fen: Some("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R b KQkq - 1 1".into()),
        ..Default::default()
    });
    let game = a.encode(b"black first").unwrap();
    assert!(game.movetext().starts_with("1... "));
    assert_eq!(a.decode_pgn(&game.to_pgn()).unwrap(), b"black first");
}

#[test]
fn test_padding_to_min_plies() {
    let a = assembler(StegoConfig {
        min_plies: 40,
        ..Default::default()
    });
    let game = a.encode(b"hi").unwrap();
    assert_eq!(game.len(), 40);
    assert_eq!(
        game.sans()[..11].join(" "),
        "Nf3 g5 g3 f5 a4 Kf7 Ng1 a5 e4 b6 Nh3"
    );
    assert_eq!(a.decode_pgn(&game.to_pgn()).unwrap(), b"hi");
}

#[test]
fn test_max_plies_bound() {
    let a = assembler(StegoConfig {
        max_plies: Some(11),
        ..Default::default()
    });
    assert_eq!(a.encode(b"hi").unwrap().len(), 11);

    let a = assembler(StegoConfig {
        max_plies: Some(10),
        ..Default::default()
    });
    assert!(matches!(
        a.encode(b"hi"),
        Err(StegoError::GameExhausted { ply: 10, .. })
    ));
}

#[test]
fn test_forced_move_policies() {
    let play = assembler(StegoConfig {
        start_fen: Some(FORCED.into()),
        ..Default::default()
    });
    let game = play.encode(b"forced").unwrap();
    assert_eq!(game.sans()[0], "Nb1");
    assert_eq!(play.decode(&game).unwrap(), b"forced");

    let reject = assembler(StegoConfig {
        start_fen: Some(FORCED.into()),
        forced_moves: ForcedMovePolicy::Reject,
        ..Default::default()
    });
    assert!(matches!(
        reject.encode(b"forced"),
        Err(StegoError::RadixTooSmall { ply: 0, radix: 1 })
    ));
    assert!(matches!(
        reject.decode(&game),
        Err(StegoError::RadixTooSmall { ply: 0, radix: 1 })
    ));
}

#[test]
fn test_game_ending_move_is_a_mismatch() {
    let start = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
    let (_, moves) = play(&start, &["Ra8#"]);
    let game = MoveSequence::from_moves(start, &moves).unwrap();

    match assembler(StegoConfig::default()).decode(&game) {
        Err(StegoError::DecodeMismatch { ply, san, .. }) => {
            assert_eq!(ply, 0);
            assert_eq!(san, "Ra8#");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_decode_inside_longer_game() {
    let (start, prefix) = play(&Position::startpos(), &["Nf3", "Nf6", "g3", "g6"]);
    let a = assembler(StegoConfig {
        start_fen: Some(start.fen()),
        ..Default::default()
    });
    let hidden = a.encode(b"after the opening").unwrap();

    let mut moves = prefix;
    moves.extend(hidden.moves());
    let full = MoveSequence::from_moves(Position::startpos(), &moves).unwrap();
    assert_eq!(full.start(), &Position::startpos());
    assert_eq!(a.decode_pgn(&full.to_pgn()).unwrap(), b"after the opening");
}

#[test]
fn test_configured_start_absent() {
    let game = assembler(StegoConfig::default()).encode(b"hi").unwrap();
    let a = assembler(StegoConfig {
        start_fen: Some(ITALIAN.into()),
        ..Default::default()
    });
    assert!(matches!(a.decode(&game), Err(StegoError::PositionInvalid(_))));
}
