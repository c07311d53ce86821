mod test_utils;

use chrono::Utc;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use seniorcare_core::{
    errors::CareError,
    models::{
        friends::{FriendRequest, Friendship, RequestAction, RequestStatus},
        message::{DirectMessage, MAX_DIRECT_MESSAGE_LEN},
        volunteer::{ChatStatus, VolunteerChat},
    },
};
use seniorcare_sync::{
    Backend, FriendService, MessageService, Notice, VolunteerMatch,
    messages::VOLUNTEER_LIST_LIMIT, mock::MockBackend,
};
use std::sync::Arc;
use test_log::test;
use uuid::Uuid;

use crate::test_utils::{World, pending_request};

#[test(tokio::test)]
async fn test_find_user_strips_at_and_whitespace() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let found = friends.find_user("  @bob ").await.unwrap();
    assert_eq!(found, Some(world.bob.clone()));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("@")]
#[tokio::test]
async fn test_find_user_rejects_empty_handle(#[case] handle: &str) {
    let mut backend = MockBackend::new();
    backend.expect_find_profile_by_username().times(0);
    let friends = FriendService::new(Arc::new(backend));

    let result = friends.find_user(handle).await;
    assert!(matches!(result, Err(CareError::Validation(_))));
}

// Searching for a handle nobody has is a normal negative result
#[test(tokio::test)]
async fn test_unknown_user_is_reported_not_thrown() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    assert_eq!(friends.find_user("@ghost").await.unwrap(), None);

    let err = friends.send_request(world.alice.id, "@ghost").await.unwrap_err();
    assert!(matches!(err, CareError::NotFound(_)));

    let notice = Notice::from_error(&err);
    assert_eq!(notice.title, "Usuário não encontrado");
    assert!(notice.destructive);
}

#[tokio::test]
async fn test_backend_not_found_on_lookup_is_none() {
    let mut backend = MockBackend::new();
    backend
        .expect_find_profile_by_username()
        .returning(|_| Err(CareError::NotFound("no rows".to_string())));
    let friends = FriendService::new(Arc::new(backend));

    assert_eq!(friends.find_user("ghost").await.unwrap(), None);
}

#[tokio::test]
async fn test_send_request_to_self_is_rejected() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let err = friends.send_request(world.alice.id, "alice").await.unwrap_err();
    assert!(matches!(err, CareError::Validation(_)));
    assert!(world.backend.pending_requests_for(world.alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_request_is_a_conflict() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let sent = friends.send_request(world.alice.id, "bob").await.unwrap();
    assert_eq!(sent.to.id, world.bob.id);
    assert_eq!(sent.request.status, RequestStatus::Pending);
    assert_eq!(Notice::request_sent(&sent.to).description, "Solicitação enviada para bob");

    let err = friends.send_request(world.alice.id, "bob").await.unwrap_err();
    assert!(matches!(err, CareError::Conflict(_)));
    assert_eq!(Notice::from_error(&err).title, "Solicitação já enviada");
}

#[tokio::test]
async fn test_accept_creates_both_directions() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let sent = friends.send_request(world.alice.id, "bob").await.unwrap();
    let updated = friends
        .respond(world.bob.id, &sent.request, RequestAction::Accept)
        .await
        .unwrap();
    assert_eq!(updated.status, RequestStatus::Accepted);

    let bob_friends = world.backend.friends_of(world.bob.id).await.unwrap();
    let alice_friends = world.backend.friends_of(world.alice.id).await.unwrap();
    assert_eq!(bob_friends.len(), 1);
    assert_eq!(bob_friends[0].friend_user_id, world.alice.id);
    assert_eq!(alice_friends.len(), 1);
    assert_eq!(alice_friends[0].friend_user_id, world.bob.id);
    assert!(world.backend.pending_requests_for(world.bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_creates_no_friendship() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let sent = friends.send_request(world.alice.id, "bob").await.unwrap();
    let updated = friends
        .respond(world.bob.id, &sent.request, RequestAction::Reject)
        .await
        .unwrap();

    assert_eq!(updated.status, RequestStatus::Rejected);
    assert!(world.backend.friends_of(world.bob.id).await.unwrap().is_empty());
    assert_eq!(Notice::request_answered(updated.status).title, "Solicitação recusada");
}

#[tokio::test]
async fn test_answering_twice_is_rejected() {
    let world = World::new();
    let friends = FriendService::new(world.backend());

    let sent = friends.send_request(world.alice.id, "bob").await.unwrap();
    let accepted = friends
        .respond(world.bob.id, &sent.request, RequestAction::Accept)
        .await
        .unwrap();

    let err = friends
        .respond(world.bob.id, &accepted, RequestAction::Reject)
        .await
        .unwrap_err();
    assert!(matches!(err, CareError::Validation(_)));
}

#[tokio::test]
async fn test_only_recipient_can_answer() {
    let mut backend = MockBackend::new();
    backend.expect_update_request_status().times(0);
    let friends = FriendService::new(Arc::new(backend));

    let me = Uuid::new_v4();
    let request = pending_request(me, Uuid::new_v4());
    let err = friends.respond(me, &request, RequestAction::Accept).await.unwrap_err();
    assert!(matches!(err, CareError::Validation(_)));
}

fn friendship(user_id: Uuid, friend_user_id: Uuid) -> Friendship {
    Friendship {
        id: Uuid::new_v4(),
        user_id,
        friend_user_id,
        created_at: Utc::now(),
    }
}

// The status update and first friendship row stay in place when the
// reverse row fails.
#[test(tokio::test)]
async fn test_partial_accept_failure_is_not_compensated() {
    let me = Uuid::new_v4();
    let sender = Uuid::new_v4();
    let request = pending_request(sender, me);
    let accepted = FriendRequest {
        status: RequestStatus::Accepted,
        ..request.clone()
    };

    let mut backend = MockBackend::new();
    let returned = accepted.clone();
    backend
        .expect_update_request_status()
        .with(eq(request.id), eq(RequestStatus::Accepted))
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));
    backend
        .expect_insert_friendship()
        .withf(move |f| f.user_id == me && f.friend_user_id == sender)
        .times(1)
        .returning(|f| Ok(friendship(f.user_id, f.friend_user_id)));
    backend
        .expect_insert_friendship()
        .withf(move |f| f.user_id == sender && f.friend_user_id == me)
        .times(1)
        .returning(|_| Err(CareError::Backend("connection reset".to_string())));
    // No rollback of any kind
    backend.expect_update_request_status().with(eq(request.id), eq(RequestStatus::Pending)).times(0);

    let friends = FriendService::new(Arc::new(backend));
    let err = friends.respond(me, &request, RequestAction::Accept).await.unwrap_err();

    assert!(matches!(err, CareError::Backend(_)));
    assert_eq!(Notice::from_error(&err).description, "Não foi possível concluir a operação.");
}

#[tokio::test]
async fn test_status_update_failure_stops_accept() {
    let me = Uuid::new_v4();
    let request = pending_request(Uuid::new_v4(), me);

    let mut backend = MockBackend::new();
    backend
        .expect_update_request_status()
        .times(1)
        .returning(|_, _| Err(CareError::Backend("timeout".to_string())));
    backend.expect_insert_friendship().times(0);

    let friends = FriendService::new(Arc::new(backend));
    let result = friends.respond(me, &request, RequestAction::Accept).await;
    assert!(matches!(result, Err(CareError::Backend(_))));
}

#[tokio::test]
async fn test_message_at_limit_is_sent() {
    let world = World::new();
    let messages = MessageService::new(world.backend());
    let content = "a".repeat(MAX_DIRECT_MESSAGE_LEN);

    let sent = messages
        .send_direct(world.alice.id, world.bob.id, &content)
        .await
        .unwrap();
    assert_eq!(sent.content.chars().count(), 1000);
}

#[rstest]
#[case("a".repeat(MAX_DIRECT_MESSAGE_LEN + 1))]
#[case("   ".to_string())]
#[case(String::new())]
#[tokio::test]
async fn test_invalid_direct_message_never_reaches_backend(#[case] content: String) {
    let mut backend = MockBackend::new();
    backend.expect_insert_direct_message().times(0);
    let messages = MessageService::new(Arc::new(backend));

    let result = messages
        .send_direct(Uuid::new_v4(), Uuid::new_v4(), &content)
        .await;
    assert!(matches!(result, Err(CareError::Validation(_))));
}

#[tokio::test]
async fn test_direct_message_is_trimmed_before_insert() {
    let from = Uuid::new_v4();
    let to = Uuid::new_v4();

    let mut backend = MockBackend::new();
    backend
        .expect_insert_direct_message()
        .withf(|m| m.content == "Tudo bem?")
        .times(1)
        .returning(|m| {
            Ok(DirectMessage {
                id: Uuid::new_v4(),
                from_user_id: m.from_user_id,
                to_user_id: m.to_user_id,
                content: m.content,
                created_at: Utc::now(),
                read: false,
            })
        });

    let messages = MessageService::new(Arc::new(backend));
    let sent = messages.send_direct(from, to, "\n Tudo bem? \t").await.unwrap();
    assert_eq!(sent.from_user_id, from);
}

#[tokio::test]
async fn test_long_chat_message_is_allowed_but_blank_is_not() {
    let world = World::new();
    let messages = MessageService::new(world.backend());
    let chat_id = Uuid::new_v4();

    let long = "b".repeat(MAX_DIRECT_MESSAGE_LEN + 500);
    assert!(messages.send_chat(chat_id, world.alice.id, &long).await.is_ok());

    let blank = messages.send_chat(chat_id, world.alice.id, "  ").await;
    assert!(matches!(blank, Err(CareError::Validation(_))));
}

#[tokio::test]
async fn test_send_failure_maps_to_generic_notice() {
    let mut backend = MockBackend::new();
    backend
        .expect_insert_chat_message()
        .returning(|_| Err(CareError::Backend("503 Service Unavailable".to_string())));
    let messages = MessageService::new(Arc::new(backend));

    let err = messages
        .send_chat(Uuid::new_v4(), Uuid::new_v4(), "oi")
        .await
        .unwrap_err();
    let notice = Notice::from_error(&err);
    assert_eq!(notice.title, "Erro");
    assert!(notice.destructive);
}

#[tokio::test]
async fn test_elder_without_chat_is_offered_volunteers() {
    let world = World::new();
    for i in 0..12 {
        world
            .backend
            .add_volunteer(&format!("voluntario{}", i), None)
            .unwrap();
    }
    let messages = MessageService::new(world.backend());

    match messages.find_volunteers(world.alice.id).await.unwrap() {
        VolunteerMatch::Available(volunteers) => {
            assert_eq!(volunteers.len(), VOLUNTEER_LIST_LIMIT);
            assert!(volunteers.iter().all(|v| v.id != world.bob.id));
        }
        other => panic!("expected volunteers, got {other:?}"),
    }
}

#[tokio::test]
async fn test_starting_a_second_chat_returns_the_active_one() {
    let world = World::new();
    let joana = world.backend.add_volunteer("joana", Some("Joana")).unwrap();
    let pedro = world.backend.add_volunteer("pedro", None).unwrap();
    let messages = MessageService::new(world.backend());

    let first = messages.start_volunteer_chat(world.alice.id, joana.id).await.unwrap();
    assert!(first.is_active());
    assert_eq!(first.elder_id, world.alice.id);

    let second = messages.start_volunteer_chat(world.alice.id, pedro.id).await.unwrap();
    assert_eq!(second, first);
    assert!(world.backend.active_chats_for_volunteer(pedro.id).await.unwrap().is_empty());

    assert_eq!(
        messages.find_volunteers(world.alice.id).await.unwrap(),
        VolunteerMatch::Existing(first)
    );
}

#[tokio::test]
async fn test_closed_chat_allows_a_new_one() {
    let world = World::new();
    let joana = world.backend.add_volunteer("joana", None).unwrap();
    let messages = MessageService::new(world.backend());

    let first = messages.start_volunteer_chat(world.alice.id, joana.id).await.unwrap();
    world
        .backend
        .set_chat_status(first.id, ChatStatus::Closed)
        .unwrap();

    let second = messages.start_volunteer_chat(world.alice.id, joana.id).await.unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_existing_chat_skips_insert() {
    let elder = Uuid::new_v4();
    let volunteer = Uuid::new_v4();
    let now = Utc::now();
    let existing = VolunteerChat {
        id: Uuid::new_v4(),
        volunteer_id: volunteer,
        elder_id: elder,
        status: ChatStatus::Active,
        created_at: now,
        updated_at: now,
    };

    let mut backend = MockBackend::new();
    let returned = existing.clone();
    backend
        .expect_active_chat_for_elder()
        .with(eq(elder))
        .times(1)
        .returning(move |_| Ok(Some(returned.clone())));
    backend.expect_insert_volunteer_chat().times(0);

    let messages = MessageService::new(Arc::new(backend));
    let chat = messages.start_volunteer_chat(elder, Uuid::new_v4()).await.unwrap();
    assert_eq!(chat, existing);
}

#[tokio::test]
async fn test_chat_with_oneself_never_reaches_backend() {
    let mut backend = MockBackend::new();
    backend.expect_active_chat_for_elder().times(0);
    backend.expect_insert_volunteer_chat().times(0);
    let messages = MessageService::new(Arc::new(backend));

    let me = Uuid::new_v4();
    let result = messages.start_volunteer_chat(me, me).await;
    assert!(matches!(result, Err(CareError::Validation(_))));
}
