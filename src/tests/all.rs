//! Unit tests for the memory match modules
//! Run with: cargo test

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::client::view::{BoardView, ClickRejected, Tile, ViewEffect, HIDE_DELAY};
use crate::client::UserCommand;
use crate::errors::validation::normalize_player_name;
use crate::errors::ErrorCategory;
use crate::game::board::{generate_faces, FlipOutcome};
use crate::game::room::{ClaimOutcome, PairState};
use crate::game::room_code::{generate_room_code, normalize_room_code, ROOM_CODE_ALPHABET};
use crate::network::messages::{
    deserialize_message, deserialize_response, serialize_response, ClientMessage, PlayerScore,
    ServerResponse,
};
use crate::{AppError, Board, GameSettings, Room, RoomManager, ServerConfig, TurnOrder};

fn cards(faces: &[&str]) -> Vec<String> {
    faces.iter().map(|face| face.to_string()).collect()
}

/// A - A - B - B, so index pairs (0, 1) and (2, 3) match.
fn small_board() -> Board {
    Board::from_cards(cards(&["A", "A", "B", "B"]))
}

fn seeded_manager() -> RoomManager {
    RoomManager::with_rng(GameSettings::default(), StdRng::seed_from_u64(7))
}

fn started_room() -> Room {
    let mut room = Room::with_host("ROOM01".to_string(), small_board(), "conn1", "Alice");
    room.add_player("conn2", "Bob");
    room.start("conn1").unwrap();
    room
}

fn to_json(response: ServerResponse) -> Value {
    serde_json::from_str(&serialize_response(response)).unwrap()
}

#[cfg(test)]
mod board_tests {
    use super::*;

    #[test]
    fn test_new_board_holds_each_face_twice() {
        let mut rng = StdRng::seed_from_u64(42);
        let board = Board::new(8, &mut rng);

        assert_eq!(board.len(), 16);
        for face in generate_faces(8) {
            let count = (0..board.len())
                .filter(|i| board.card(*i) == Some(face.as_str()))
                .count();
            assert_eq!(count, 2, "face {} should appear twice", face);
        }
        assert!(board.revealed().iter().all(|revealed| !revealed));
        assert!(board.temp_flips().is_empty());
    }

    #[test]
    fn test_generate_faces_uses_leading_letters() {
        assert_eq!(generate_faces(3), cards(&["A", "B", "C"]));
        assert_eq!(generate_faces(26).last().map(String::as_str), Some("Z"));
    }

    #[test]
    fn test_first_flip_stays_open() {
        let mut board = small_board();

        let outcome = board.flip(2).unwrap();

        assert_eq!(
            outcome,
            FlipOutcome::First {
                value: "B".to_string()
            }
        );
        assert_eq!(board.temp_flips(), &[2]);
    }

    #[test]
    fn test_matching_pair_is_revealed() {
        let mut board = small_board();
        board.flip(0).unwrap();

        let outcome = board.flip(1).unwrap();

        assert_eq!(
            outcome,
            FlipOutcome::Pair {
                value: "A".to_string(),
                indices: [0, 1],
                matched: true,
            }
        );
        assert_eq!(board.revealed(), &[true, true, false, false]);
        assert!(board.temp_flips().is_empty());
        assert!(!board.is_complete());
    }

    #[test]
    fn test_mismatch_stays_pending_until_hidden() {
        let mut board = small_board();
        board.flip(0).unwrap();
        let outcome = board.flip(3).unwrap();

        assert!(matches!(outcome, FlipOutcome::Pair { matched: false, .. }));
        assert!(board.has_pending_mismatch());
        assert_eq!(board.flip(1), Err(AppError::MismatchPending));

        assert_eq!(board.hide_mismatch(), vec![0, 3]);
        assert!(!board.has_pending_mismatch());
        assert!(board.flip(1).is_ok());
    }

    #[test]
    fn test_invalid_indices_are_rejected() {
        let mut board = small_board();

        assert_eq!(board.flip(-1), Err(AppError::InvalidCardIndex { index: -1 }));
        assert_eq!(board.flip(4), Err(AppError::InvalidCardIndex { index: 4 }));
        assert!(board.temp_flips().is_empty());
    }

    #[test]
    fn test_unavailable_cards_are_rejected() {
        let mut board = small_board();
        board.flip(0).unwrap();
        assert_eq!(board.flip(0), Err(AppError::CardUnavailable { index: 0 }));

        board.flip(1).unwrap();
        assert_eq!(board.flip(1), Err(AppError::CardUnavailable { index: 1 }));
    }

    #[test]
    fn test_board_completes_when_all_pairs_found() {
        let mut board = small_board();
        for index in 0..4 {
            board.flip(index).unwrap();
        }
        assert!(board.is_complete());
    }
}

#[cfg(test)]
mod turn_order_tests {
    use super::*;

    #[test]
    fn test_advance_wraps_around() {
        let mut turn = TurnOrder::new();

        assert_eq!(turn.advance_turn(3), 1);
        assert_eq!(turn.advance_turn(3), 2);
        assert_eq!(turn.advance_turn(3), 0);
    }

    #[test]
    fn test_advance_with_no_players_stays_at_zero() {
        let mut turn = TurnOrder::new();
        assert_eq!(turn.advance_turn(0), 0);
    }

    #[test]
    fn test_removing_earlier_seat_keeps_active_player() {
        let mut turn = TurnOrder::new();
        turn.advance_turn(3);
        turn.advance_turn(3);

        turn.player_removed(0, 2);

        assert_eq!(turn.current(), 1);
    }

    #[test]
    fn test_removing_last_active_seat_wraps() {
        let mut turn = TurnOrder::new();
        turn.advance_turn(2);

        turn.player_removed(1, 1);

        assert_eq!(turn.current(), 0);
    }

    #[test]
    fn test_reset() {
        let mut turn = TurnOrder::new();
        turn.advance_turn(4);
        turn.reset();
        assert_eq!(turn, TurnOrder::default());
    }
}

#[cfg(test)]
mod room_code_tests {
    use super::*;

    #[test]
    fn test_generated_codes_use_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        let code = generate_room_code(6, &mut rng);

        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|byte| ROOM_CODE_ALPHABET.contains(&byte)));
    }

    #[test]
    fn test_normalize_room_code() {
        assert_eq!(normalize_room_code("  ab12cd "), Some("AB12CD".to_string()));
        assert_eq!(normalize_room_code("   "), None);
        assert_eq!(normalize_room_code(""), None);
    }
}

#[cfg(test)]
mod room_tests {
    use super::*;

    #[test]
    fn test_room_with_host() {
        let room = Room::with_host("ROOM01".to_string(), small_board(), "conn1", "Alice");

        assert_eq!(room.code(), "ROOM01");
        assert_eq!(room.host(), Some("conn1"));
        assert_eq!(room.host_name(), Some("Alice".to_string()));
        assert_eq!(room.player_count(), 1);
        assert!(!room.is_started());
    }

    #[test]
    fn test_claim_host_on_reserved_room() {
        let mut room = Room::new("ROOM01".to_string(), small_board());
        room.add_player("conn2", "Bob");

        assert_eq!(room.claim_host("conn1", "Alice"), Ok(ClaimOutcome::Claimed));
        assert_eq!(room.seat_of("conn1"), Some(0));
        assert_eq!(room.seat_of("conn2"), Some(1));
        assert_eq!(room.claim_host("conn1", "Alice"), Ok(ClaimOutcome::AlreadyHost));
        assert!(matches!(
            room.claim_host("conn3", "Carol"),
            Err(AppError::RoomHasHost { .. })
        ));
    }

    #[test]
    fn test_add_player_twice_is_ignored() {
        let mut room = Room::with_host("ROOM01".to_string(), small_board(), "conn1", "Alice");

        assert!(room.add_player("conn2", "Bob"));
        assert!(!room.add_player("conn2", "Bob"));
        assert_eq!(room.player_count(), 2);
    }

    #[test]
    fn test_only_host_can_start() {
        let mut room = Room::with_host("ROOM01".to_string(), small_board(), "conn1", "Alice");
        room.add_player("conn2", "Bob");

        assert_eq!(room.start("conn2"), Err(AppError::NotHost));
        assert!(!room.is_started());
        assert_eq!(room.start("conn1"), Ok(()));
        assert!(room.is_started());
        assert_eq!(room.current_turn(), 0);
    }

    #[test]
    fn test_flip_rules() {
        let mut room = Room::with_host("ROOM01".to_string(), small_board(), "conn1", "Alice");
        room.add_player("conn2", "Bob");

        assert_eq!(room.flip_card("conn1", 0), Err(AppError::GameNotStarted));
        room.start("conn1").unwrap();
        assert_eq!(room.flip_card("conn2", 0), Err(AppError::NotPlayerTurn));
        assert_eq!(room.flip_card("stranger", 0), Err(AppError::NotInRoom));
    }

    #[test]
    fn test_match_scores_and_keeps_turn() {
        let mut room = started_room();

        let first = room.flip_card("conn1", 0).unwrap();
        assert_eq!(first.pair, PairState::Open);
        assert_eq!(first.value, "A");

        let second = room.flip_card("conn1", 1).unwrap();
        assert_eq!(
            second.pair,
            PairState::Matched {
                indices: [0, 1],
                complete: false
            }
        );
        assert_eq!(room.players()[0].score, 1);
        assert_eq!(room.current_turn(), 0);
    }

    #[test]
    fn test_mismatch_passes_turn_on_resolve() {
        let mut room = started_room();
        room.flip_card("conn1", 0).unwrap();
        let report = room.flip_card("conn1", 2).unwrap();

        let PairState::Mismatched { indices, round } = report.pair else {
            panic!("Expected a mismatch");
        };
        assert_eq!(indices, [0, 2]);
        assert_eq!(room.flip_card("conn1", 3), Err(AppError::MismatchPending));

        assert!(!room.resolve_mismatch(round + 1));
        assert!(room.resolve_mismatch(round));
        assert_eq!(room.current_turn(), 1);
        assert!(room.board().temp_flips().is_empty());
        assert!(!room.resolve_mismatch(round));
    }

    #[test]
    fn test_last_pair_completes_game() {
        let mut room = started_room();
        room.flip_card("conn1", 0).unwrap();
        room.flip_card("conn1", 1).unwrap();
        room.flip_card("conn1", 2).unwrap();
        let report = room.flip_card("conn1", 3).unwrap();

        assert_eq!(
            report.pair,
            PairState::Matched {
                indices: [2, 3],
                complete: true
            }
        );
        assert_eq!(
            room.game_over(),
            ServerResponse::GameOver {
                players: vec![
                    PlayerScore {
                        name: "Alice".to_string(),
                        score: 2
                    },
                    PlayerScore {
                        name: "Bob".to_string(),
                        score: 0
                    },
                ]
            }
        );
    }

    #[test]
    fn test_started_room_cannot_be_claimed() {
        let mut room = started_room();
        room.remove_player("conn1");

        assert_eq!(room.host(), Some("conn2"));
        assert!(matches!(
            room.claim_host("conn3", "Carol"),
            Err(AppError::RoomHasHost { .. })
        ));
        assert_eq!(room.current_turn(), 0);
        assert_eq!(room.player_count(), 1);
    }

    #[test]
    fn test_host_leaving_promotes_first_player() {
        let mut room = started_room();
        room.add_player("conn3", "Carol");

        let removed = room.remove_player("conn1").unwrap();

        assert_eq!(removed.player.name, "Alice");
        assert_eq!(removed.new_host, Some("Bob".to_string()));
        assert_eq!(room.host(), Some("conn2"));
        assert!(room.remove_player("conn1").is_none());
    }

    #[test]
    fn test_active_player_leaving_mid_pair_hides_cards() {
        let mut room = started_room();
        room.add_player("conn3", "Carol");
        room.flip_card("conn1", 0).unwrap();
        let round = room.mismatch_round();

        room.remove_player("conn1");

        assert!(room.board().temp_flips().is_empty());
        assert!(room.mismatch_round() > round);
        assert_eq!(room.players()[room.current_turn()].name, "Bob");
    }

    #[test]
    fn test_lobby_update_shape() {
        let room = started_room();

        assert_eq!(
            to_json(room.lobby_update()),
            json!({
                "event": "lobby_update",
                "data": {
                    "room": "ROOM01",
                    "players": [{"name": "Alice"}, {"name": "Bob"}],
                    "host": "Alice",
                    "started": true
                }
            })
        );
    }
}

#[cfg(test)]
mod room_manager_tests {
    use super::*;

    #[test]
    fn test_create_room_generates_code() {
        let mut manager = seeded_manager();

        let code = manager.create_room("conn1", None, Some("Alice")).unwrap();

        assert_eq!(code.len(), 6);
        let room = manager.room(&code).unwrap();
        assert_eq!(room.host_name(), Some("Alice".to_string()));
        assert_eq!(room.board().len(), 16);
        assert_eq!(manager.get_rooms_from_connection_id("conn1"), vec![code]);
    }

    #[test]
    fn test_create_room_defaults_host_name() {
        let mut manager = seeded_manager();

        let code = manager.create_room("conn1", Some(" abc "), None).unwrap();

        assert_eq!(code, "ABC");
        assert_eq!(
            manager.room("ABC").unwrap().host_name(),
            Some("Host".to_string())
        );
    }

    #[test]
    fn test_second_create_is_rejected() {
        let mut manager = seeded_manager();
        manager.create_room("conn1", Some("ABC"), Some("Alice")).unwrap();

        assert_eq!(
            manager.create_room("conn2", Some("ABC"), Some("Bob")),
            Err(AppError::RoomHasHost {
                room: "ABC".to_string()
            })
        );
        assert_eq!(
            manager.create_room("conn1", Some("abc"), Some("Alice")),
            Ok("ABC".to_string())
        );
    }

    fn one_char_codes() -> RoomManager {
        let settings = GameSettings {
            code_length: 1,
            ..GameSettings::default()
        };
        RoomManager::with_rng(settings, StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_full_code_space_returns_error() {
        let mut manager = one_char_codes();
        for (seat, code) in ROOM_CODE_ALPHABET.iter().enumerate() {
            let code = (*code as char).to_string();
            let connection_id = format!("conn{}", seat);
            manager
                .create_room(&connection_id, Some(code.as_str()), Some("Alice"))
                .unwrap();
        }
        assert_eq!(manager.room_count(), ROOM_CODE_ALPHABET.len());

        assert_eq!(manager.reserve_room(), Err(AppError::RoomCodesExhausted));
        assert_eq!(
            manager.create_room("late", None, Some("Bob")),
            Err(AppError::RoomCodesExhausted)
        );
        assert_eq!(manager.room_count(), ROOM_CODE_ALPHABET.len());
    }

    #[test]
    fn test_reserving_past_capacity_terminates() {
        let mut manager = one_char_codes();

        let failures = (0..100)
            .map(|_| manager.reserve_room())
            .filter(|result| result == &Err(AppError::RoomCodesExhausted))
            .count();

        assert!(failures > 0);
        assert!(manager.room_count() <= ROOM_CODE_ALPHABET.len());
    }

    #[test]
    fn test_unclaimed_reservation_expires() {
        let mut manager = seeded_manager();
        let code = manager.reserve_room().unwrap();

        assert!(manager.expire_reservation(&code));
        assert!(manager.room(&code).is_none());
        assert!(!manager.expire_reservation(&code));
    }

    #[test]
    fn test_used_reservation_does_not_expire() {
        let mut manager = seeded_manager();
        let claimed = manager.reserve_room().unwrap();
        manager
            .create_room("conn1", Some(claimed.as_str()), Some("Alice"))
            .unwrap();
        let joined = manager.reserve_room().unwrap();
        manager.join_room("conn2", &joined, Some("Bob")).unwrap();

        assert!(!manager.expire_reservation(&claimed));
        assert!(!manager.expire_reservation(&joined));
        assert_eq!(manager.room_count(), 2);
    }

    #[test]
    fn test_reserved_room_is_claimed_by_creator() {
        let mut manager = seeded_manager();
        let code = manager.reserve_room().unwrap();
        assert_eq!(manager.room(&code).unwrap().host(), None);

        manager
            .create_room("conn1", Some(code.as_str()), Some("Alice"))
            .unwrap();

        assert_eq!(manager.room(&code).unwrap().host(), Some("conn1"));
        assert_eq!(manager.room_count(), 1);
    }

    #[test]
    fn test_join_room() {
        let mut manager = seeded_manager();
        let code = manager.create_room("conn1", None, Some("Alice")).unwrap();

        let outcome = manager
            .join_room("conn2", &code.to_lowercase(), None)
            .unwrap();

        assert_eq!(outcome.room, code);
        assert!(outcome.newly_joined);
        assert_eq!(manager.room(&code).unwrap().players()[1].name, "Player");
        assert!(!manager.join_room("conn2", &code, None).unwrap().newly_joined);
        assert_eq!(manager.get_connections_id_from_room_id(&code), vec!["conn1", "conn2"]);
    }

    #[test]
    fn test_join_unknown_room_fails() {
        let mut manager = seeded_manager();

        assert_eq!(
            manager.join_room("conn1", "NOPE", Some("Alice")),
            Err(AppError::RoomDoesNotExist {
                room: "NOPE".to_string()
            })
        );
    }

    #[test]
    fn test_start_and_flip_unknown_room() {
        let mut manager = seeded_manager();

        assert!(matches!(
            manager.start_game("conn1", "NOPE"),
            Err(AppError::RoomNotFound { .. })
        ));
        assert!(matches!(
            manager.flip_card("conn1", "NOPE", 0),
            Err(AppError::RoomNotFound { .. })
        ));
    }

    #[test]
    fn test_last_player_leaving_closes_room() {
        let mut manager = seeded_manager();
        let code = manager.create_room("conn1", None, Some("Alice")).unwrap();
        manager.join_room("conn2", &code, Some("Bob")).unwrap();

        let outcome = manager.leave_room("conn1", &code).unwrap();
        assert!(!outcome.room_closed);
        assert_eq!(outcome.removed.new_host, Some("Bob".to_string()));

        let outcome = manager.leave_room("conn2", &code).unwrap();
        assert!(outcome.room_closed);
        assert!(manager.room(&code).is_none());
        assert!(manager.get_rooms_from_connection_id("conn2").is_empty());
    }

    #[test]
    fn test_leave_room_not_joined_is_noop() {
        let mut manager = seeded_manager();
        let code = manager.create_room("conn1", None, Some("Alice")).unwrap();

        assert!(manager.leave_room("conn2", &code).is_none());
        assert!(manager.leave_room("conn1", "").is_none());
        assert_eq!(manager.room(&code).unwrap().player_count(), 1);
    }

    #[test]
    fn test_disconnect_leaves_every_room() {
        let mut manager = seeded_manager();
        let first = manager.create_room("conn1", None, Some("Alice")).unwrap();
        let second = manager.create_room("conn2", None, Some("Bob")).unwrap();
        manager.join_room("conn1", &second, Some("Alice")).unwrap();

        let outcomes = manager.disconnect("conn1");

        assert_eq!(outcomes.len(), 2);
        assert!(manager.room(&first).is_none());
        assert_eq!(manager.room(&second).unwrap().player_count(), 1);
        assert!(manager.get_rooms_from_connection_id("conn1").is_empty());
    }

    #[test]
    fn test_close_room_unindexes_connections() {
        let mut manager = seeded_manager();
        let code = manager.create_room("conn1", None, Some("Alice")).unwrap();

        assert!(manager.close_room(&code).is_some());
        assert!(manager.get_rooms_from_connection_id("conn1").is_empty());
        assert!(manager.close_room(&code).is_none());
    }
}

#[cfg(test)]
mod messages_tests {
    use super::*;

    #[test]
    fn test_deserialize_client_messages() {
        let message =
            deserialize_message(r#"{"event":"flip_card","data":{"room":"ab","index":3}}"#)
                .unwrap();
        assert_eq!(
            message,
            ClientMessage::FlipCard {
                room: "ab".to_string(),
                index: 3
            }
        );

        let message = deserialize_message(r#"{"event":"create_room","data":{}}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::CreateRoom {
                room: None,
                name: None
            }
        );

        assert_eq!(
            deserialize_message(r#"{"event":"ping"}"#).unwrap(),
            ClientMessage::Ping
        );
    }

    #[test]
    fn test_null_room_reads_as_empty() {
        assert_eq!(
            deserialize_message(r#"{"event":"join_room","data":{"room":null,"name":"Ann"}}"#)
                .unwrap(),
            ClientMessage::JoinRoom {
                room: String::new(),
                name: Some("Ann".to_string())
            }
        );
        assert_eq!(
            deserialize_message(r#"{"event":"leave_room","data":{"room":null}}"#).unwrap(),
            ClientMessage::LeaveRoom {
                room: String::new()
            }
        );
    }

    #[test]
    fn test_flip_index_is_read_leniently() {
        let index_of = |data: &str| {
            let text = format!(r#"{{"event":"flip_card","data":{}}}"#, data);
            match deserialize_message(&text).unwrap() {
                ClientMessage::FlipCard { index, .. } => index,
                other => panic!("Expected FlipCard, got {:?}", other),
            }
        };

        assert_eq!(index_of(r#"{"room":"AB","index":"3"}"#), 3);
        assert_eq!(index_of(r#"{"room":"AB","index":" 12 "}"#), 12);
        assert_eq!(index_of(r#"{"room":"AB","index":2.0}"#), 2);
        assert_eq!(index_of(r#"{"room":"AB","index":"two"}"#), -1);
        assert_eq!(index_of(r#"{"room":null,"index":null}"#), -1);
    }

    #[test]
    fn test_null_room_flip_reports_missing_room() {
        let mut manager = seeded_manager();
        let message =
            deserialize_message(r#"{"event":"flip_card","data":{"room":null,"index":"0"}}"#)
                .unwrap();
        let ClientMessage::FlipCard { room, index } = message else {
            panic!("Expected FlipCard");
        };

        let error = manager.flip_card("conn1", &room, index).unwrap_err();

        assert_eq!(
            ServerResponse::from_app_error(&error),
            ServerResponse::Error {
                msg: "Room not found".to_string()
            }
        );
    }

    #[test]
    fn test_missing_index_is_invalid() {
        let message = deserialize_message(r#"{"event":"flip_card","data":{"room":"AB"}}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::FlipCard {
                room: "AB".to_string(),
                index: -1
            }
        );
    }

    #[test]
    fn test_unknown_event_fails() {
        assert!(deserialize_message(r#"{"event":"dance","data":{}}"#).is_err());
        assert!(deserialize_message("not json").is_err());
    }

    #[test]
    fn test_match_result_uses_match_key() {
        let value = to_json(ServerResponse::MatchResult {
            matched: false,
            indices: [1, 5],
            player: 0,
        });

        assert_eq!(
            value,
            json!({"event": "match_result", "data": {"match": false, "indices": [1, 5], "player": 0}})
        );
    }

    #[test]
    fn test_unit_response_shape() {
        assert_eq!(to_json(ServerResponse::Pong), json!({"event": "pong"}));
    }

    #[test]
    fn test_response_round_trip_for_client() {
        let text = serialize_response(ServerResponse::CardFlipped {
            index: 4,
            value: "C".to_string(),
        });
        assert_eq!(
            deserialize_response(&text).unwrap(),
            ServerResponse::CardFlipped {
                index: 4,
                value: "C".to_string()
            }
        );
    }

    #[test]
    fn test_errors_map_to_events() {
        assert_eq!(
            ServerResponse::from_app_error(&AppError::NotPlayerTurn),
            ServerResponse::TurnError {
                msg: "Not your turn".to_string()
            }
        );
        assert_eq!(
            ServerResponse::from_app_error(&AppError::RoomDoesNotExist {
                room: "X".to_string()
            }),
            ServerResponse::JoinFailed {
                reason: "Room does not exist".to_string()
            }
        );
        assert_eq!(
            ServerResponse::from_app_error(&AppError::RoomHasHost {
                room: "X".to_string()
            }),
            ServerResponse::CreateFailed {
                reason: "Room already has a host".to_string()
            }
        );
        assert_eq!(
            ServerResponse::from_app_error(&AppError::CardUnavailable { index: 2 }),
            ServerResponse::Error {
                msg: "Card already matched or currently flipped".to_string()
            }
        );
    }
}

#[cfg(test)]
mod errors_tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(AppError::NotPlayerTurn.category(), ErrorCategory::GameError);
        assert_eq!(
            AppError::Internal {
                message: "x".to_string()
            }
            .category(),
            ErrorCategory::ServerError
        );
    }

    #[test]
    fn test_server_errors_are_hidden_from_users() {
        let error = AppError::Internal {
            message: "channel closed".to_string(),
        };
        assert_eq!(
            error.user_friendly_message(),
            "Something went wrong on the server"
        );
        assert_eq!(
            AppError::SerializationError {
                message: "eof".to_string()
            }
            .user_friendly_message(),
            "Invalid message format"
        );
    }

    #[test]
    fn test_player_name_normalization() {
        assert_eq!(normalize_player_name(Some("  Ann "), "Player"), Ok("Ann".to_string()));
        assert_eq!(normalize_player_name(Some("   "), "Player"), Ok("Player".to_string()));
        assert_eq!(normalize_player_name(None, "Host"), Ok("Host".to_string()));
        assert!(normalize_player_name(Some(&"x".repeat(51)), "Player").is_err());
        assert!(normalize_player_name(Some("bad\nname"), "Player").is_err());
    }

    #[test]
    fn test_config_validation() {
        let config = ServerConfig::default();
        let settings = config.game_settings().unwrap();
        assert_eq!(settings.pair_count, 8);
        assert_eq!(settings.mismatch_delay.as_millis(), 1000);

        let config = ServerConfig {
            pairs: 27,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.game_settings(),
            Err(AppError::InvalidConfig { .. })
        ));

        for code_length in [0, 1, 3] {
            let config = ServerConfig {
                code_length,
                ..ServerConfig::default()
            };
            assert!(config.game_settings().is_err(), "length {}", code_length);
        }

        let config = ServerConfig {
            code_length: 4,
            reservation_ttl_secs: 30,
            ..ServerConfig::default()
        };
        let settings = config.game_settings().unwrap();
        assert_eq!(settings.reservation_ttl.as_secs(), 30);
    }
}

#[cfg(test)]
mod client_view_tests {
    use super::*;

    fn score(name: &str, score: u32) -> PlayerScore {
        PlayerScore {
            name: name.to_string(),
            score,
        }
    }

    fn started_view(my_name: &str) -> BoardView {
        let mut view = BoardView::new("room01", my_name);
        view.apply(ServerResponse::GameStarted {
            card_count: 4,
            players: vec![score("Alice", 0), score("Bob", 0)],
            current_turn: 0,
        });
        view
    }

    #[test]
    fn test_handshake_joins_then_creates() {
        let view = BoardView::new("room01", "Alice");

        assert_eq!(
            view.handshake(),
            vec![
                ClientMessage::JoinRoom {
                    room: "ROOM01".to_string(),
                    name: Some("Alice".to_string())
                },
                ClientMessage::CreateRoom {
                    room: Some("ROOM01".to_string()),
                    name: Some("Alice".to_string())
                },
            ]
        );
    }

    #[test]
    fn test_handshake_without_room_creates_one() {
        let mut view = BoardView::new("", "Alice");
        assert_eq!(
            view.handshake(),
            vec![ClientMessage::CreateRoom {
                room: None,
                name: Some("Alice".to_string())
            }]
        );

        view.apply(ServerResponse::RoomCreated {
            room: "XYZ123".to_string(),
        });
        assert_eq!(view.room(), "XYZ123");
    }

    #[test]
    fn test_click_before_sync_is_rejected() {
        let view = BoardView::new("room01", "Alice");
        assert_eq!(view.click(0), Err(ClickRejected::WaitingForSync));
        assert_eq!(view.turn_info(), "Waiting...");
    }

    #[test]
    fn test_click_checks_turn() {
        let alice = started_view("Alice");
        let bob = started_view("Bob");

        assert_eq!(
            alice.click(2),
            Ok(ClientMessage::FlipCard {
                room: "ROOM01".to_string(),
                index: 2
            })
        );
        assert_eq!(bob.click(2), Err(ClickRejected::NotYourTurn));
        assert_eq!(bob.turn_info(), "Current turn: Alice");
    }

    #[test]
    fn test_mismatch_hides_after_delay() {
        let mut view = started_view("Alice");
        view.apply(ServerResponse::CardFlipped {
            index: 0,
            value: "A".to_string(),
        });
        view.apply(ServerResponse::CardFlipped {
            index: 2,
            value: "B".to_string(),
        });
        let effects = view.apply(ServerResponse::MatchResult {
            matched: false,
            indices: [0, 2],
            player: 0,
        });

        assert_eq!(
            effects,
            vec![ViewEffect::HideLater {
                indices: [0, 2],
                after: HIDE_DELAY
            }]
        );
        assert_eq!(view.tiles()[2], Tile::FaceUp("B".to_string()));

        view.hide_temporary(&[0, 2]);
        assert_eq!(view.tiles(), vec![Tile::FaceDown; 4]);
    }

    #[test]
    fn test_match_marks_tiles() {
        let mut view = started_view("Alice");
        view.apply(ServerResponse::CardFlipped {
            index: 1,
            value: "A".to_string(),
        });
        view.apply(ServerResponse::MatchResult {
            matched: true,
            indices: [0, 1],
            player: 0,
        });

        assert_eq!(view.tiles()[0], Tile::Matched);
        assert_eq!(view.tiles()[1], Tile::Matched);
        assert!(view.is_revealed(1));
    }

    #[test]
    fn test_board_state_replaces_local_state() {
        let mut view = started_view("Bob");
        view.apply(ServerResponse::BoardState {
            revealed: vec![true, true, false, false],
            temp: vec![3],
            players: vec![score("Alice", 1), score("Bob", 0)],
            current_turn: 1,
        });

        assert_eq!(
            view.tiles(),
            vec![Tile::Matched, Tile::Matched, Tile::FaceDown, Tile::Pending]
        );
        assert!(view.click(2).is_ok());
        assert!(view.player_lines()[1].active);
    }

    #[test]
    fn test_game_over_names_winner_or_tie() {
        let mut view = started_view("Alice");
        let effects = view.apply(ServerResponse::GameOver {
            players: vec![score("Alice", 3), score("Bob", 1)],
        });
        assert_eq!(
            effects,
            vec![
                ViewEffect::Alert("Game over! Winner: Alice (3 points)".to_string()),
                ViewEffect::Exit
            ]
        );

        let effects = view.apply(ServerResponse::GameOver {
            players: vec![score("Alice", 2), score("Bob", 2)],
        });
        assert_eq!(
            effects[0],
            ViewEffect::Alert("Game over! Tie: Alice, Bob (2 points)".to_string())
        );
    }

    #[test]
    fn test_join_failed_exits() {
        let mut view = BoardView::new("NOPE", "Alice");
        let effects = view.apply(ServerResponse::JoinFailed {
            reason: "Room does not exist".to_string(),
        });
        assert_eq!(effects.last(), Some(&ViewEffect::Exit));
    }

    #[test]
    fn test_user_command_parsing() {
        assert_eq!("flip 3".parse::<UserCommand>(), Ok(UserCommand::Flip(3)));
        assert_eq!("7".parse::<UserCommand>(), Ok(UserCommand::Flip(7)));
        assert_eq!("start".parse::<UserCommand>(), Ok(UserCommand::Start));
        assert_eq!("leave".parse::<UserCommand>(), Ok(UserCommand::Leave));
        assert!("flip".parse::<UserCommand>().is_err());
        assert!("dance now".parse::<UserCommand>().is_err());
    }

    #[test]
    fn test_waiting_display() {
        let view = BoardView::new("room01", "Alice");
        assert_eq!(
            view.to_string(),
            "Room ROOM01\nWaiting for host to start the game...\n"
        );
    }
}
