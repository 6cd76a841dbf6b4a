use std::io::{self, Write};
use std::str::FromStr;

use anyhow::Result;
use colored::*;
use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use school_transport_client::config::environment::EnvironmentConfig;
use school_transport_client::dto::driver_dto::{DocumentUpload, DriverVerificationForm};
use school_transport_client::dto::student_dto::{NewStudentForm, ParentDetails, StudentDetails};
use school_transport_client::models::{
    AttendanceStatus, Destination, GeoPoint, Period, RideStatus, StudentViewModel,
};
use school_transport_client::services::{payment_service, trip_service, AttendanceBoard};
use school_transport_client::utils::validation::validate_date;
use school_transport_client::{AppError, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenvy::dotenv().ok();

    let config = EnvironmentConfig::from_env()?;
    let default_filter = if config.is_development() {
        "school_transport_client=debug"
    } else {
        "school_transport_client=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚌 Driver console ({}) -> {}", config.environment, config.api_base_url);

    let state = AppState::new(config).await?;

    println!("{}", "🚌 School Transport - Driver Console".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());

    let mut destination = state.auth().resolve_launch_destination().await?;
    loop {
        let next = match destination {
            Destination::SignIn => sign_in_menu(&state).await?,
            Destination::Verification => verification_menu(&state).await?,
            Destination::PendingVerification => pending_menu(&state).await?,
            Destination::Home => home_menu(&state).await?,
        };
        match next {
            Some(next) => destination = next,
            None => break,
        }
    }

    println!("{}", "👋 ¡Hasta luego!".bright_green());
    Ok(())
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn title(text: &str) {
    println!();
    println!("{}", text.bright_green().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_green());
}

fn show_error(e: &AppError) {
    error!("{}", e);
    println!("{} {}", "❌".bright_red(), e.user_notice().bright_red());
}

fn show_ok(message: &str) {
    println!("{} {}", "✅".bright_green(), message);
}

async fn sign_in_menu(state: &AppState) -> Result<Option<Destination>> {
    title("🔐 INICIO DE SESIÓN");
    println!("1. Iniciar sesión");
    println!("2. Crear cuenta");
    println!("3. Salir");

    match prompt("Selecciona una opción (1-3): ")?.as_str() {
        "1" => {
            let email = prompt("Email: ")?;
            let password = prompt("Password: ")?;
            match state.auth().sign_in(&email, &password).await {
                Ok(destination) => return Ok(Some(destination)),
                Err(e) => show_error(&e),
            }
        }
        "2" => {
            let name = prompt("Nombre: ")?;
            let email = prompt("Email: ")?;
            let password = prompt("Password: ")?;
            match state.auth().register(&name, &email, &password).await {
                Ok(message) => show_ok(&message),
                Err(e) => show_error(&e),
            }
        }
        "3" => return Ok(None),
        _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
    }
    Ok(Some(Destination::SignIn))
}

async fn verification_menu(state: &AppState) -> Result<Option<Destination>> {
    title("🪪 VERIFICACIÓN DE IDENTIDAD");
    println!("1. Enviar documentos");
    println!("2. Cerrar sesión");
    println!("3. Salir");

    match prompt("Selecciona una opción (1-3): ")?.as_str() {
        "1" => {
            let form = match read_verification_form().await {
                Ok(form) => form,
                Err(e) => {
                    show_error(&e);
                    return Ok(Some(Destination::Verification));
                }
            };
            match state.verification().submit(&form).await {
                Ok(message) => {
                    show_ok(&message);
                    return Ok(Some(Destination::PendingVerification));
                }
                Err(e) => show_error(&e),
            }
        }
        "2" => {
            state.auth().sign_out().await?;
            return Ok(Some(Destination::SignIn));
        }
        "3" => return Ok(None),
        _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
    }
    Ok(Some(Destination::Verification))
}

async fn read_verification_form() -> Result<DriverVerificationForm, AppError> {
    let full_name = prompt("Nombre completo: ")?;
    let nic_number = prompt("NIC: ")?;
    let license_number = prompt("Licencia: ")?;
    let phone_num = prompt("Teléfono: ")?;
    let address = prompt("Dirección: ")?;
    let dob = prompt("Fecha de nacimiento (DD/MM/YYYY): ")?;
    let selfie = DocumentUpload::read_jpeg(prompt("Ruta del selfie (.jpg): ")?, "selfie.jpg").await?;
    let nic = DocumentUpload::read_jpeg(prompt("Ruta del NIC (.jpg): ")?, "nic.jpg").await?;
    let license = DocumentUpload::read_jpeg(prompt("Ruta de la licencia (.jpg): ")?, "license.jpg").await?;

    Ok(DriverVerificationForm {
        full_name,
        nic_number,
        license_number,
        phone_num,
        address,
        dob,
        selfie,
        nic,
        license,
    })
}

async fn pending_menu(state: &AppState) -> Result<Option<Destination>> {
    title("⏳ VERIFICACIÓN PENDIENTE");
    println!("1. Consultar estado");
    println!("2. Cerrar sesión");
    println!("3. Salir");

    match prompt("Selecciona una opción (1-3): ")?.as_str() {
        "1" => match state.auth().refresh_verification_status().await {
            Ok(status) => {
                println!("Estado: {}", status.as_str().bright_cyan());
                return Ok(Some(Destination::for_status(&status)));
            }
            Err(e) => show_error(&e),
        },
        "2" => {
            state.auth().sign_out().await?;
            return Ok(Some(Destination::SignIn));
        }
        "3" => return Ok(None),
        _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
    }
    Ok(Some(Destination::PendingVerification))
}

async fn home_menu(state: &AppState) -> Result<Option<Destination>> {
    title("📋 MENÚ PRINCIPAL");
    println!("1. ✅ Asistencia");
    println!("2. 👧 Estudiantes");
    println!("3. ➕ Añadir estudiante");
    println!("4. 🚌 Viajes");
    println!("5. 💰 Pagos");
    println!("6. 🪪 Perfil");
    println!("7. 🚪 Cerrar sesión");
    println!("8. Salir");

    match prompt("Selecciona una opción (1-8): ")?.as_str() {
        "1" => attendance_screen(state).await?,
        "2" => students_screen(state).await?,
        "3" => add_student_screen(state).await?,
        "4" => trips_screen(state).await?,
        "5" => payments_screen(state).await?,
        "6" => profile_screen(state).await,
        "7" => {
            state.auth().sign_out().await?;
            return Ok(Some(Destination::SignIn));
        }
        "8" => return Ok(None),
        _ => println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red()),
    }
    Ok(Some(Destination::Home))
}

fn print_board(board: &AttendanceBoard, views: &[StudentViewModel]) {
    println!(
        "{} {} · {}",
        "📅".bright_blue(),
        board.date(),
        board.period().as_str().bright_cyan()
    );
    if views.is_empty() {
        println!("{}", "No students found".bright_black());
    }
    for view in views {
        let attendance = match view.attendance_status {
            Some(AttendanceStatus::Present) => "PRESENT".bright_green(),
            Some(AttendanceStatus::Absent) => "ABSENT".bright_red(),
            None => "-".normal(),
        };
        let ride = match view.ride_status {
            Some(RideStatus::PickedUp) => "PICKED_UP".bright_yellow(),
            Some(RideStatus::Dropped) => "DROPPED".bright_blue(),
            None => "-".normal(),
        };
        println!(
            "#{:<4} {:<24} {:<10} {:<10} {}",
            view.id(),
            view.student.full_name,
            attendance,
            ride,
            format!("{} · grade {}", view.student.school, view.student.grade).bright_black()
        );
    }
}

async fn reload_board(board: &AttendanceBoard) {
    match board.load().await {
        Ok(report) if !report.applied => {
            println!("{}", "⚠️ La fecha cambió durante la carga, vuelve a cargar".yellow());
        }
        Ok(report) => {
            show_ok(&format!("{} estudiantes, {} registros", report.students, report.records));
            if let Some(notice) = report.attendance_notice {
                println!("{} {}", "⚠️".yellow(), notice.yellow());
            }
        }
        Err(e) => show_error(&e),
    }
}

async fn attendance_screen(state: &AppState) -> Result<()> {
    let board = state.attendance_board();
    reload_board(&board).await;

    loop {
        title("✅ ASISTENCIA");
        print_board(&board, &board.students());
        println!("Comandos: m/a/t (tramo) · present|absent|pick|drop <id> · s <texto> · d <YYYY-MM-DD> · r · b");

        let line = prompt("> ")?;
        let (command, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let arg = arg.trim();
        let student_id = arg.parse::<i64>().ok();

        let outcome = match (command, student_id) {
            ("m", _) => {
                board.set_period(Period::Morning);
                continue;
            }
            ("a", _) => {
                board.set_period(Period::Afternoon);
                continue;
            }
            ("t", _) => {
                board.set_period(board.period().other());
                continue;
            }
            ("present", Some(id)) => board.mark_attendance(id, AttendanceStatus::Present).await,
            ("absent", Some(id)) => board.mark_attendance(id, AttendanceStatus::Absent).await,
            ("pick", Some(id)) => board.mark_ride(id, RideStatus::PickedUp).await,
            ("drop", Some(id)) => board.mark_ride(id, RideStatus::Dropped).await,
            ("s", _) => {
                print_board(&board, &board.filtered(arg));
                continue;
            }
            ("d", _) => match validate_date(arg) {
                Ok(date) => {
                    board.set_date(date);
                    reload_board(&board).await;
                    continue;
                }
                Err(_) => {
                    println!("{}", "❌ Fecha inválida (YYYY-MM-DD)".bright_red());
                    continue;
                }
            },
            ("r", _) => {
                reload_board(&board).await;
                continue;
            }
            ("b", _) => return Ok(()),
            _ => {
                println!("{}", "❌ Comando inválido".bright_red());
                continue;
            }
        };

        match outcome {
            Ok(Some(message)) => show_ok(&message),
            Ok(None) => {}
            Err(e) => show_error(&e),
        }
    }
}

async fn students_screen(state: &AppState) -> Result<()> {
    title("👧 ESTUDIANTES");
    match state.students().list().await {
        Ok(students) => {
            for student in &students {
                println!(
                    "#{:<4} {:<24} {:<16} grade {:<4} {}",
                    student.id,
                    student.full_name,
                    student.school,
                    student.grade,
                    student.phone.bright_black()
                );
            }
            let id = prompt("Id para ver detalle (vacío para volver): ")?;
            if let Ok(id) = id.parse::<i64>() {
                match state.students().details(id).await {
                    Ok(student) => println!("{}", serde_json::to_string_pretty(&student)?),
                    Err(e) => show_error(&e),
                }
            }
        }
        Err(e) => show_error(&e),
    }
    Ok(())
}

fn read_point(label: &str) -> io::Result<GeoPoint> {
    let latitude = prompt(&format!("{} latitud: ", label))?.parse().unwrap_or(0.0);
    let longitude = prompt(&format!("{} longitud: ", label))?.parse().unwrap_or(0.0);
    Ok(GeoPoint { latitude, longitude })
}

async fn add_student_screen(state: &AppState) -> Result<()> {
    title("➕ NUEVO ESTUDIANTE");
    let parent = ParentDetails {
        full_name: prompt("Nombre del padre/tutor: ")?,
        email: prompt("Email: ")?,
        phone: prompt("Teléfono: ")?,
        address: prompt("Dirección: ")?,
    };
    let student = StudentDetails {
        full_name: prompt("Nombre del estudiante: ")?,
        grade: prompt("Curso: ")?,
        school: prompt("Colegio: ")?,
        pickup: read_point("Recogida")?,
        dropoff: read_point("Destino")?,
        monthly_fee: Decimal::from_str(&prompt("Cuota mensual: ")?).unwrap_or(Decimal::ZERO),
    };

    match state.students().add(&NewStudentForm { parent, student }).await {
        Ok(message) => show_ok(&message),
        Err(e) => show_error(&e),
    }
    Ok(())
}

async fn trips_screen(state: &AppState) -> Result<()> {
    title("🚌 VIAJES");
    let summaries = match state.trips().summaries().await {
        Ok(summaries) => summaries,
        Err(e) => {
            show_error(&e);
            return Ok(());
        }
    };

    let query = prompt("Buscar fecha (vacío para todas): ")?;
    for summary in trip_service::search_summaries(&summaries, &query) {
        println!(
            "{:<14} mañana {:<3} tarde {:<3} total {}",
            summary.formatted_date(),
            summary.morning_count,
            summary.afternoon_count,
            summary.total()
        );
    }

    let date = prompt("Fecha para ver detalle (YYYY-MM-DD, vacío para volver): ")?;
    if let Ok(date) = validate_date(&date) {
        match state.trips().details(date).await {
            Ok(details) => {
                for detail in details {
                    println!(
                        "{:<24} mañana {:<8} tarde {:<8}",
                        detail.student_name,
                        status_label(detail.status(Period::Morning)),
                        status_label(detail.status(Period::Afternoon))
                    );
                }
            }
            Err(e) => show_error(&e),
        }
    }
    Ok(())
}

fn status_label(status: Option<AttendanceStatus>) -> &'static str {
    match status {
        Some(AttendanceStatus::Present) => "PRESENT",
        Some(AttendanceStatus::Absent) => "ABSENT",
        None => "-",
    }
}

async fn payments_screen(state: &AppState) -> Result<()> {
    let payments_service = state.payments();
    loop {
        title("💰 PAGOS");
        let payments = match payments_service.list().await {
            Ok(payments) => payments,
            Err(e) => {
                show_error(&e);
                return Ok(());
            }
        };
        let today = chrono::Local::now().date_naive();
        let summary = school_transport_client::models::PaymentSummary::from_payments(&payments, today);
        println!(
            "Cobrado {} · Pendiente {} · Vencido {} ({} pagos)",
            summary.collected.to_string().bright_green(),
            summary.outstanding.to_string().bright_yellow(),
            summary.overdue_amount.to_string().bright_red(),
            summary.overdue_count
        );
        for payment in &payments {
            let late = if payment.is_overdue(today) { " ⚠️" } else { "" };
            println!(
                "{:<6} {:<24} {:<10} {:<8} {:>10}{}",
                payment.id.as_deref().unwrap_or("-"),
                payment.student_name,
                payment.month,
                payment.payment_status.as_str(),
                payment.amount,
                late
            );
        }
        println!("Comandos: s <texto> · o (vencidos) · remind <id> · all · paid <id> · b");

        let line = prompt("> ")?;
        let (command, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let arg = arg.trim();
        match command {
            "s" => {
                for payment in payment_service::search(&payments, arg) {
                    println!("{:<24} {:<10} {}", payment.student_name, payment.month, payment.amount);
                }
            }
            "o" => {
                for payment in payment_service::overdue(&payments, today) {
                    println!("{:<24} {:<10} {}", payment.student_name, payment.month, payment.amount);
                }
            }
            "remind" if !arg.is_empty() => match payments_service.remind(arg).await {
                Ok(message) => show_ok(&message),
                Err(e) => show_error(&e),
            },
            "all" => match payments_service.remind_all().await {
                Ok(message) => show_ok(&message),
                Err(e) => show_error(&e),
            },
            "paid" if !arg.is_empty() => match payments_service.mark_paid(arg).await {
                Ok(_) => show_ok("Payment status updated"),
                Err(e) => show_error(&e),
            },
            "b" => return Ok(()),
            _ => println!("{}", "❌ Comando inválido".bright_red()),
        }
        prompt("Enter para continuar...")?;
    }
}

async fn profile_screen(state: &AppState) {
    title("🪪 PERFIL");
    let verification = state.verification();
    let profile = match verification.driver_details().await {
        Ok(profile) => Some(profile),
        Err(e) => {
            show_error(&e);
            verification.cached_driver().await.ok().flatten()
        }
    };

    if let Some(profile) = profile {
        println!("{} ({})", profile.full_name.bright_cyan(), profile.badge());
        println!("NIC: {}  Licencia: {}", profile.nic_number, profile.license_number);
        println!("Teléfono: {}  Dirección: {}", profile.phone_num, profile.address);
        if let Some(dob) = profile.date_of_birth {
            println!("Nacimiento: {}", dob.format("%d/%m/%Y"));
        }
        if let Some(link) = profile.selfie_link(state.backend.base_url()) {
            println!("Selfie: {}", link.bright_black());
        }
    }
}
