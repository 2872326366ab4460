use axum::http::StatusCode;

use appleverse_backend::{jwt::JWT_KEYS, models::PrincipalKind};
use helper::*;

mod helper;

const DATASET: &str = "\
ACNO,Cultivar Name,e_origin country,Taste,Orchard Row
12345,Honeycrisp,USA,Sweet,A1
23456,Gala,New Zealand,Mild,A2
34567,Fuji,Japan,Crisp,B1
";

fn admin_token() -> String {
    JWT_KEYS.generate_token(1, PrincipalKind::Admin).unwrap()
}

fn archive() -> Vec<u8> {
    build_zip(&[
        ("photos/12345_Honeycrisp_1.jpg", "h1".as_bytes()),
        ("photos/12345_Honeycrisp_2.JPG", "h2".as_bytes()),
        ("photos/gala.png", "g".as_bytes()),
        ("photos/IMG_0001.jpg", "x".as_bytes()),
        ("photos/notes.txt", "ignored".as_bytes()),
        ("__MACOSX/photos/._gala.png", "fork".as_bytes()),
    ])
}

#[tokio::test]
async fn test_preview_then_commit() {
    let t = TestApp::new();
    let admin = t.add_principal(PrincipalKind::Admin, "root@example.com", "secret1").await;
    let token = JWT_KEYS.generate_token(admin.id, PrincipalKind::Admin).unwrap();
    let zip = archive();

    let req = build_multipart_request(
        "/api/v1/apples/bulk-import/preview",
        Some(&token),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let report = &read_json(res).await["data"];
    assert_eq!(report["totalRows"], 3);
    assert_eq!(report["totalImages"], 4);
    assert_eq!(report["matched"].as_array().unwrap().len(), 2);
    assert_eq!(report["matched"][0]["images"].as_array().unwrap().len(), 2);
    assert_eq!(report["unmatchedRows"][0]["cultivarName"], "Fuji");
    assert_eq!(report["unmatchedRows"][0]["rowNumber"], 4);
    assert_eq!(report["unmatchedImages"][0], "IMG_0001.jpg");
    // preview writes nothing
    assert!(t.apples.all().is_empty());

    let overrides = r#"[{"rowIndex": 2, "imageKey": "IMG_0001.jpg"}]"#;
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import",
        Some(&token),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
            ("overrides", None, overrides.as_bytes()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let report = &read_json(res).await["data"];
    assert_eq!(report["stats"]["total"], 3);
    assert_eq!(report["stats"]["successful"], 3);
    assert_eq!(report["stats"]["failed"], 0);

    let apples = t.apples.all();
    assert_eq!(apples.len(), 3);
    let honeycrisp = &apples[0];
    assert_eq!(honeycrisp.details.acno, "12345");
    assert_eq!(honeycrisp.details.origin_country, "USA");
    assert_eq!(honeycrisp.details.taste, "Sweet");
    assert_eq!(
        honeycrisp.details.metadata.get("Orchard Row").map(String::as_str),
        Some("A1")
    );
    assert_eq!(honeycrisp.images.len(), 2);
    assert_eq!(honeycrisp.created_by, Some(admin.id));
    assert_eq!(apples[2].images, vec!["/images/IMG_0001.jpg".to_string()]);
    assert_eq!(t.images.saved().len(), 4);

    let stored = t.principals.get(PrincipalKind::Admin, admin.id).unwrap();
    assert_eq!(stored.activity_log.last().unwrap().action, "bulk_import");
}

#[tokio::test]
async fn test_commit_without_overrides_skips_unmatched_rows() {
    let t = TestApp::new();
    let zip = archive();
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import",
        Some(&admin_token()),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let report = &read_json(res).await["data"];
    assert_eq!(report["stats"]["total"], 2);
    let names: Vec<_> = t.apples.all().into_iter().map(|a| a.cultivar_name).collect();
    assert_eq!(names, vec!["Honeycrisp", "Gala"]);
}

#[tokio::test]
async fn test_failed_row_does_not_stop_others() {
    let images = MemoryImages {
        fail_on: Some("gala.png".to_owned()),
        ..Default::default()
    };
    let t = TestApp::with_images(images);
    let zip = archive();
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import",
        Some(&admin_token()),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let report = &read_json(res).await["data"];
    assert_eq!(report["stats"]["successful"], 1);
    assert_eq!(report["stats"]["failed"], 1);
    assert_eq!(report["failures"][0]["index"], 1);
    assert_eq!(t.apples.all().len(), 1);
}

#[tokio::test]
async fn test_duplicate_rows_reject_the_whole_import() {
    let t = TestApp::new();
    let dataset = "accession,cultivar\n1,Gala\n2,Fuji\n1,Gala\n";
    let zip = archive();
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import",
        Some(&admin_token()),
        &[
            ("dataset", Some("apples.csv"), dataset.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Gala"), "{message}");
    assert!(t.apples.all().is_empty());
}

#[tokio::test]
async fn test_override_of_claimed_image_is_rejected() {
    let t = TestApp::new();
    let zip = archive();
    let overrides = r#"[{"rowIndex": 2, "imageKey": "gala.png"}]"#;
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import",
        Some(&admin_token()),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
            ("overrides", None, overrides.as_bytes()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(t.apples.all().is_empty());
}

#[tokio::test]
async fn test_import_requires_admin() {
    let t = TestApp::new();
    let user = JWT_KEYS.generate_token(1, PrincipalKind::User).unwrap();
    let zip = archive();
    let req = build_multipart_request(
        "/api/v1/apples/bulk-import/preview",
        Some(&user),
        &[
            ("dataset", Some("apples.csv"), DATASET.as_bytes()),
            ("images", Some("photos.zip"), zip.as_slice()),
        ],
    );
    let res = send(&t.app, req).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
