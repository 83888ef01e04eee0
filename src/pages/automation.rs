use std::str::FromStr;

use actix_web::{dev, get, http::header::{ContentDisposition, DispositionParam, DispositionType}, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use chrono::{Local, NaiveDate};
use futures_util::future::LocalBoxFuture;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::Manager,
    entity::{finalized_payroll, prelude::*},
    pages::ApiError,
    payroll::{compose_net_pay, render_csv, ExportColumn, ExportRow, PayrollComputed, PayrollDraft, TaxConstants},
    utils,
};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(finalize_and_export)
        .service(export_finalized)
        .service(get_finalized);
}

/// Recomputes a draft server side and stores it as a finalized payroll.
///
/// Responds with the stored record, or with a one-row payslip CSV when
/// `format` is `csv`.
#[post("/finalize-and-export")]
async fn finalize_and_export(
    db: web::Data<DatabaseConnection>,
    constants: web::Data<TaxConstants>,
    manager: Manager,
    payload: web::Json<FinalizeRequest>,
) -> Result<impl Responder, ApiError> {
    let FinalizeRequest { mut draft, format } = payload.into_inner();

    if let Some(ExportFormat::Pdf | ExportFormat::Xlsx) = format {
        return Err(ApiError::BadRequest("only csv exports are supported"));
    }

    let (Some(recruiter_id), Some(start_date), Some(end_date)) = (draft.recruiter_id, draft.start_date, draft.end_date) else {
        return Err(ApiError::BadRequest("`recruiter_id`, `start_date` and `end_date` are required"));
    };

    if end_date < start_date {
        return Err(ApiError::BadRequest("`end_date` is earlier than `start_date`"));
    }

    let Some(employee) = User::find_by_id(recruiter_id).one(db.as_ref()).await? else {
        return Err(ApiError::NotFound);
    };

    draft.resolve_defaults();
    draft.employee_name.get_or_insert_with(|| employee.username.clone());

    let computed = compose_net_pay(&draft, &constants)?;

    let record = finalized_record(manager.id, employee.id, (start_date, end_date), &draft, &computed)?;
    let payroll = FinalizedPayroll::insert(record)
        .exec_with_returning(db.as_ref()).await?;

    info!(payroll = %payroll.id, employee = %payroll.employee_id, manager = %manager.id, net_pay = %payroll.net_pay, "finalized payroll");

    match format {
        Some(ExportFormat::Csv) => {
            let row = ExportRow::try_from(payroll)?;
            let filename = utils::export_filename(&row.employee_name, row.start_date, row.end_date, "csv");

            Ok(csv_response(HttpResponse::Created(), filename, render_csv(&ExportColumn::ALL, &[row])))
        },
        _ => Ok(HttpResponse::Created().json(web::Json(payroll))),
    }
}

/// Finalized payrolls whose period lies within `start_date..=end_date`, as CSV
#[get("/export-finalized")]
async fn export_finalized(db: web::Data<DatabaseConnection>, _manager: Manager, query: web::Query<ExportQuery>) -> Result<impl Responder, ApiError> {
    if query.format.unwrap_or_default() != ExportFormat::Csv {
        return Err(ApiError::BadRequest("only csv exports are supported"));
    }

    if query.end_date < query.start_date {
        return Err(ApiError::BadRequest("`end_date` is earlier than `start_date`"));
    }

    let columns = ExportColumn::selection(query.columns.as_deref())?;

    let mut select = FinalizedPayroll::find()
        .filter(finalized_payroll::Column::StartDate.gte(query.start_date))
        .filter(finalized_payroll::Column::EndDate.lte(query.end_date));

    if let Some(recruiter_id) = query.recruiter_id {
        select = select.filter(finalized_payroll::Column::EmployeeId.eq(recruiter_id));
    }

    let payrolls = select
        .order_by_asc(finalized_payroll::Column::EmployeeName)
        .order_by_asc(finalized_payroll::Column::StartDate)
        .all(db.as_ref()).await?;

    let rows = payrolls
        .into_iter()
        .map(ExportRow::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    info!(rows = rows.len(), columns = columns.len(), "exported finalized payrolls");

    let employee = match (query.recruiter_id, rows.first()) {
        (Some(_), Some(row)) => row.employee_name.as_str(),
        _ => "all",
    };
    let filename = utils::export_filename(employee, query.start_date, query.end_date, "csv");

    Ok(csv_response(HttpResponse::Ok(), filename, render_csv(&columns, &rows)))
}

#[get("/finalized/{payroll_id}")]
async fn get_finalized(_manager: Manager, payroll: finalized_payroll::Model) -> impl Responder {
    web::Json(payroll)
}

/// Row to insert for a finalized payroll. Stored hours are the rounded hours
/// the pay figures were computed from.
fn finalized_record(
    created_by: Uuid,
    employee_id: Uuid,
    (start_date, end_date): (NaiveDate, NaiveDate),
    draft: &PayrollDraft,
    computed: &PayrollComputed,
) -> Result<finalized_payroll::ActiveModel, ApiError> {
    Ok(finalized_payroll::ActiveModel {
        id: Set(Uuid::new_v4()),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        created_by: Set(Some(created_by)),
        updated_by: Set(Some(created_by)),
        employee_id: Set(employee_id),
        employee_name: Set(draft.employee_name.clone().unwrap_or_default()),
        region: Set(draft.region.to_string()),
        start_date: Set(start_date),
        end_date: Set(end_date),
        hours_worked: Set(computed.regular_hours + computed.overtime_hours),
        gross_pay: Set(computed.gross_pay),
        vacation_pay: Set(computed.vacation_pay),
        tax_amount: Set(computed.tax_amount),
        total_deductions: Set(computed.total_deductions),
        net_pay: Set(computed.net_pay),
        draft: Set(serde_json::to_value(draft).map_err(ApiError::Encoding)?),
        computed: Set(serde_json::to_value(computed).map_err(ApiError::Encoding)?),
    })
}

fn csv_response(mut builder: actix_web::HttpResponseBuilder, filename: String, body: String) -> HttpResponse {
    builder
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(body)
}

#[cfg(test)]
mod tests {
    use actix_web::{body::MessageBody, http::{header, Method, StatusCode}, test, App};
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{
        auth::{tests::user_with_role, Authority},
        entity::sea_orm_active_enums::RoleType,
        payroll::Region,
    };

    use super::*;

    pub(super) fn stored(employee_id: Uuid, name: &str, start_date: NaiveDate, end_date: NaiveDate) -> finalized_payroll::Model {
        let mut draft = PayrollDraft {
            recruiter_id: Some(employee_id),
            employee_name: Some(name.to_string()),
            region: Region::Ca,
            province: Some("ON".to_string()),
            start_date: Some(start_date),
            end_date: Some(end_date),
            rate: Some(dec!(20)),
            hours_worked: Some(dec!(50)),
            ..Default::default()
        };
        draft.resolve_defaults();
        let computed: PayrollComputed = compose_net_pay(&draft, &TaxConstants::default()).unwrap();

        finalized_payroll::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            created_by: None,
            updated_by: None,
            employee_id,
            employee_name: name.to_string(),
            region: draft.region.to_string(),
            start_date,
            end_date,
            hours_worked: dec!(50),
            gross_pay: computed.gross_pay,
            vacation_pay: computed.vacation_pay,
            tax_amount: computed.tax_amount,
            total_deductions: computed.total_deductions,
            net_pay: computed.net_pay,
            draft: serde_json::to_value(&draft).unwrap(),
            computed: serde_json::to_value(&computed).unwrap(),
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[::core::prelude::v1::test]
    fn test_finalized_record() {
        let manager_id = Uuid::new_v4();
        let employee_id = Uuid::new_v4();

        let mut draft = PayrollDraft {
            employee_name: Some("Jane".to_string()),
            region: Region::Ca,
            province: Some("ON".to_string()),
            rate: Some(dec!(20)),
            hours_worked: Some(dec!(50.005)),
            ..Default::default()
        };
        draft.resolve_defaults();
        let computed = compose_net_pay(&draft, &TaxConstants::default()).unwrap();

        let record = finalized_record(manager_id, employee_id, (date(3, 1), date(3, 7)), &draft, &computed).unwrap();

        assert_eq!(record.hours_worked.unwrap(), dec!(50.01));
        assert_eq!(computed.overtime_hours, dec!(6.01));
        assert_eq!(record.employee_name.unwrap(), "Jane");
        assert_eq!(record.created_by.unwrap(), Some(manager_id));
        assert_eq!(record.employee_id.unwrap(), employee_id);
        assert_eq!(record.net_pay.unwrap(), computed.net_pay);

        let stored: PayrollDraft = serde_json::from_value(record.draft.unwrap()).unwrap();
        assert_eq!(stored, draft);
    }

    #[actix_web::test]
    async fn test_finalize() {
        let secret = b"secret";
        let manager = user_with_role("Alice", RoleType::Manager);
        let employee = user_with_role("bob", RoleType::Employee);
        let token = Authority::new(secret).issue_for(&manager).unwrap();

        let payroll = stored(employee.id, "bob", date(3, 1), date(3, 7));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ])
            .append_query_results([
                vec![ payroll.clone() ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(TaxConstants::default()))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/automation/payroll").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/automation/payroll/finalize-and-export")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(serde_json::json!({
                "recruiter_id": employee.id,
                "start_date": "2025-03-01",
                "end_date": "2025-03-07",
                "province": "ON",
                "rate": "20",
                "hours_worked": 50,
            }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let returned: finalized_payroll::Model = test::read_body_json(response).await;
        assert_eq!(returned.id, payroll.id);
        assert_eq!(returned.net_pay, dec!(1102.40));
    }

    #[actix_web::test]
    async fn test_finalize_as_csv() {
        let secret = b"secret";
        let manager = user_with_role("Alice", RoleType::Manager);
        let employee = user_with_role("bob", RoleType::Employee);
        let token = Authority::new(secret).issue_for(&manager).unwrap();

        let payroll = stored(employee.id, "Bob Smith", date(3, 1), date(3, 7));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ])
            .append_query_results([
                vec![ payroll ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(TaxConstants::default()))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/automation/payroll").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri("/automation/payroll/finalize-and-export")
            .method(Method::POST)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(serde_json::json!({
                "recruiter_id": employee.id,
                "employee_name": "Bob Smith",
                "start_date": "2025-03-01",
                "end_date": "2025-03-07",
                "rate": 20,
                "hours_worked": 50,
                "format": "csv",
            }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap(),
            "attachment; filename=\"payroll_bob_smith_2025-03-01_2025-03-07.csv\""
        );

        let body = response.into_body().try_into_bytes().unwrap();
        let csv = String::from_utf8_lossy(&body);
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().starts_with("employee_name,start_date,end_date,region,province,"));
        assert!(lines.next().unwrap().starts_with("Bob Smith,2025-03-01,2025-03-07,ca,ON,weekly,"));
        assert_eq!(lines.next(), None);
    }

    #[actix_web::test]
    async fn test_finalize_rejects_bad_request() {
        let secret = b"secret";
        let manager = user_with_role("Alice", RoleType::Manager);
        let token = Authority::new(secret).issue_for(&manager).unwrap();
        let recruiter_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                Vec::<crate::entity::user::Model>::new(),
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(TaxConstants::default()))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/automation/payroll").configure(config))
        ).await;

        for (body, status) in [
            (serde_json::json!({ "start_date": "2025-03-01", "end_date": "2025-03-07" }), StatusCode::BAD_REQUEST),
            (serde_json::json!({ "recruiter_id": recruiter_id, "start_date": "2025-03-08", "end_date": "2025-03-07" }), StatusCode::BAD_REQUEST),
            (serde_json::json!({ "recruiter_id": recruiter_id, "start_date": "2025-03-01", "end_date": "2025-03-07", "format": "pdf" }), StatusCode::BAD_REQUEST),
            (serde_json::json!({ "recruiter_id": recruiter_id, "start_date": "2025-03-01", "end_date": "2025-03-07" }), StatusCode::NOT_FOUND),
        ] {
            let req = test::TestRequest::default()
                .uri("/automation/payroll/finalize-and-export")
                .method(Method::POST)
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(body)
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), status);
        }
    }

    #[actix_web::test]
    async fn test_export_finalized() {
        let secret = b"secret";
        let manager = user_with_role("Alice", RoleType::Manager);
        let token = Authority::new(secret).issue_for(&manager).unwrap();
        let employee_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![
                    stored(employee_id, "Jane", date(3, 1), date(3, 7)),
                    stored(employee_id, "Jane", date(3, 8), date(3, 14)),
                ],
            ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/automation/payroll").configure(config))
        ).await;

        let req = test::TestRequest::default()
            .uri(&format!(
                "/automation/payroll/export-finalized?recruiter_id={employee_id}&start_date=2025-03-01&end_date=2025-03-31&format=csv&columns=start_date,net_pay"
            ))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap(),
            "attachment; filename=\"payroll_jane_2025-03-01_2025-03-31.csv\""
        );

        let body = response.into_body().try_into_bytes().unwrap();
        assert_eq!(
            String::from_utf8_lossy(&body),
            "start_date,net_pay,employee_name,include_vacation_in_gross,retirement_amount\r\n\
             2025-03-01,1102.40,Jane,true,0.00\r\n\
             2025-03-08,1102.40,Jane,true,0.00\r\n"
        );
    }

    #[actix_web::test]
    async fn test_export_finalized_rejects_bad_query() {
        let secret = b"secret";
        let manager = user_with_role("Alice", RoleType::Manager);
        let token = Authority::new(secret).issue_for(&manager).unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()))
                .service(web::scope("/automation/payroll").configure(config))
        ).await;

        for query in [
            "start_date=2025-03-01&end_date=2025-03-31&format=xlsx",
            "start_date=2025-03-01&end_date=2025-03-31&columns=net_pay,salary",
            "start_date=2025-03-31&end_date=2025-03-01",
            "start_date=2025-03-01",
        ] {
            let req = test::TestRequest::default()
                .uri(&format!("/automation/payroll/export-finalized?{query}"))
                .insert_header(("Authorization", format!("Bearer {token}")))
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
        }
    }
}
