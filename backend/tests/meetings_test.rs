mod common;

use serde_json::{json, Value};

async fn admin(app: &common::TestApp) -> (String, String) {
    let (username, password) = common::create_test_admin(&app.pool).await;
    let token = common::get_auth_token(app, &username, &password).await;
    (username, token)
}

async fn create_meeting(
    app: &common::TestApp,
    token: &str,
    title: &str,
    date: &str,
    start: &str,
    end: &str,
) -> Value {
    let resp = common::http_client()
        .post(app.url("/meetings"))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "date": date,
            "location": "Ruang Rapat Lt. 3",
            "audience": "Seluruh Pegawai",
            "start_time": start,
            "end_time": end,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201, "meeting {} should be created", title);
    resp.json().await.unwrap()
}

async fn delete_meeting(app: &common::TestApp, id: &str) {
    let _ = sqlx::query("DELETE FROM meetings WHERE id = $1::uuid")
        .bind(id)
        .execute(&app.pool)
        .await;
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn meeting_crud_round_trip() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();

    let created = create_meeting(&app, &token, "Rapat Anggaran", &common::local_date(3), "09:00", "10:00").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["date"], common::local_date(3));
    assert!(created["note"].is_null());

    let resp = client
        .put(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "end_time": "11:30", "note": "Bawa laptop" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["end_time"], "11:30");
    assert_eq!(updated["note"], "Bawa laptop");
    assert_eq!(updated["title"], "Rapat Anggaran", "absent fields are kept");

    let resp = client
        .put(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "title": "Rapat Anggaran 2025" }))
        .send()
        .await
        .unwrap();
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["note"], "Bawa laptop", "an absent note is kept");

    let resp = client
        .put(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "note": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert!(updated["note"].is_null(), "an explicit null clears the note");
    assert_eq!(updated["title"], "Rapat Anggaran 2025");

    let resp = client
        .get(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(app.url(&format!("/meetings/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn unknown_meeting_id_returns_404_for_read_update_delete() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();
    let url = app.url(&format!("/meetings/{}", uuid::Uuid::new_v4()));

    let resp = client.get(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .put(&url)
        .bearer_auth(&token)
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn invalid_meeting_is_not_persisted() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let marker = format!("no-title-{}", uuid::Uuid::new_v4());

    let resp = common::http_client()
        .post(app.url("/meetings"))
        .bearer_auth(&token)
        .json(&json!({
            "date": common::local_date(1),
            "location": marker,
            "audience": "a",
            "start_time": "09:00",
            "end_time": "10:00",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE location = $1")
        .bind(&marker)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn past_meetings_never_appear_in_time_windowed_lists() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();

    let past = create_meeting(&app, &token, "Kemarin", &common::local_date(-1), "00:00", "23:59").await;
    let future = create_meeting(&app, &token, "Lusa", &common::local_date(2), "08:00", "23:59").await;
    let past_id = past["id"].as_str().unwrap().to_string();
    let future_id = future["id"].as_str().unwrap().to_string();

    let upcoming: Value = client
        .get(app.url("/meetings"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!ids(&upcoming).contains(&past_id));
    assert!(ids(&upcoming).contains(&future_id));

    for path in ["/lobby-meetings", "/running-text"] {
        let resp = client.get(app.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "{} is public", path);
        let list: Value = resp.json().await.unwrap();
        assert!(list.as_array().unwrap().len() <= 4);
        assert!(!ids(&list).contains(&past_id), "{} leaked a past meeting", path);
    }

    let all: Value = client
        .get(app.url("/meetings/all"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(ids(&all).contains(&past_id), "the unfiltered list keeps history");

    delete_meeting(&app, &past_id).await;
    delete_meeting(&app, &future_id).await;
    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn lobby_filters_on_end_time_and_caps_at_four_rows() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();
    let tomorrow = common::local_date(1);

    // No wall-clock time is earlier than "00:00", so this one never qualifies.
    let ended = create_meeting(&app, &token, "Selesai", &tomorrow, "00:00", "00:00").await;
    let ended_id = ended["id"].as_str().unwrap().to_string();

    let mut qualifying = Vec::new();
    for i in 0..5 {
        let start = format!("{:02}:00", 8 + i);
        let m = create_meeting(&app, &token, &format!("Sesi {}", i), &tomorrow, &start, "23:59").await;
        qualifying.push(m["id"].as_str().unwrap().to_string());
    }

    let lobby: Value = client
        .get(app.url("/lobby-meetings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!ids(&lobby).contains(&ended_id), "lobby returned an ended meeting");
    assert!(lobby.as_array().unwrap().len() <= 4);
    if common::local_hhmm() != "23:59" {
        assert_eq!(lobby.as_array().unwrap().len(), 4, "five meetings qualify");
    }

    // The lobby selection is not empty, so the ticker shows it and never
    // falls back to the ended meeting.
    let ticker: Value = client
        .get(app.url("/running-text"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!ids(&ticker).contains(&ended_id), "running text fell back needlessly");
    assert!(ticker.as_array().unwrap().len() <= 4);

    delete_meeting(&app, &ended_id).await;
    for id in &qualifying {
        delete_meeting(&app, id).await;
    }
    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn upcoming_list_orders_same_day_meetings_by_start_time() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let day = common::local_date(30);

    let late = create_meeting(&app, &token, "Sore", &day, "15:00", "16:00").await;
    let early = create_meeting(&app, &token, "Pagi", &day, "08:30", "09:30").await;
    let late_id = late["id"].as_str().unwrap().to_string();
    let early_id = early["id"].as_str().unwrap().to_string();

    let upcoming: Value = common::http_client()
        .get(app.url("/meetings"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order = ids(&upcoming);
    let early_pos = order.iter().position(|i| *i == early_id).unwrap();
    let late_pos = order.iter().position(|i| *i == late_id).unwrap();
    assert!(early_pos < late_pos);

    delete_meeting(&app, &late_id).await;
    delete_meeting(&app, &early_id).await;
    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn duplicate_audience_name_returns_400() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();
    let name = format!("Tim {}", &uuid::Uuid::new_v4().to_string()[..8]);

    let resp = client
        .post(app.url("/audiences"))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(app.url("/audiences"))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let _ = sqlx::query("DELETE FROM audiences WHERE name = $1")
        .bind(&name)
        .execute(&app.pool)
        .await;
    common::delete_test_admin(&app.pool, &username).await;
}

#[tokio::test]
async fn room_crud_round_trip() {
    let Some(app) = common::setup_test_app().await else { return };
    let (username, token) = admin(&app).await;
    let client = common::http_client();

    let resp = client
        .post(app.url("/rooms"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Ruang Garuda", "capacity": 40, "location_type": "Gedung A" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let room: Value = resp.json().await.unwrap();
    let id = room["id"].as_str().unwrap().to_string();

    let resp = client
        .put(app.url(&format!("/rooms/{}", id)))
        .bearer_auth(&token)
        .json(&json!({ "capacity": 55 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let room: Value = resp.json().await.unwrap();
    assert_eq!(room["capacity"], 55);
    assert_eq!(room["name"], "Ruang Garuda");

    let list: Value = client
        .get(app.url("/rooms"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(ids(&list).contains(&id));

    let resp = client
        .delete(app.url(&format!("/rooms/{}", id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    common::delete_test_admin(&app.pool, &username).await;
}
