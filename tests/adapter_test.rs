// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provider API Tests
//!
//! Connections, commands, parameters, readers and transactions used the way
//! application data access code uses them.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};

use sqlsim::api::{Command, Connection, ConnectionState, Parameter};
use sqlsim::{DataType, DataValue, Error, Simulation};

fn open_connection() -> Connection {
    let connection = Connection::new(Arc::new(Simulation::new()));
    connection.open();
    connection
}

struct NoopWaker;

impl Wake for NoopWaker {
    fn wake(self: Arc<Self>) {}
}

/// Poll a future that is already complete
fn resolve<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let waker = Waker::from(Arc::new(NoopWaker));
    let mut cx = Context::from_waker(&waker);
    match future.as_mut().poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("future should complete immediately"),
    }
}

fn seed(connection: &Connection) {
    connection
        .create_command(
            "CREATE TABLE Products (Id int NOT NULL, Name nvarchar(100) NOT NULL, Price float, Stock bigint);
             INSERT INTO Products VALUES (1, N'Widget', 2.5, 100), (2, N'Gadget', 10.0, NULL), (3, N'Gizmo', NULL, 7)",
        )
        .execute_non_query()
        .unwrap();
}

#[test]
fn test_execute_non_query_sums_counts() {
    let connection = open_connection();
    let command = connection.create_command(
        "SET NOCOUNT ON; CREATE TABLE t (v int); INSERT t VALUES (1); INSERT t VALUES (2), (3)",
    );
    assert_eq!(command.execute_non_query().unwrap(), 3);

    let ddl_only = connection.create_command("CREATE TABLE u (v int)");
    assert_eq!(ddl_only.execute_non_query().unwrap(), -1);

    let select_only = connection.create_command("SELECT 1");
    assert_eq!(select_only.execute_non_query().unwrap(), -1);
}

#[test]
fn test_reader() {
    let connection = open_connection();
    seed(&connection);

    let mut reader = connection
        .create_command("SELECT Id, Name, Price, Stock FROM Products WHERE Id <= 2")
        .execute_reader()
        .unwrap();
    assert_eq!(reader.field_count(), 4);
    assert!(reader.has_rows());
    assert_eq!(reader.get_name(1).unwrap(), "Name");
    assert_eq!(reader.get_ordinal("PRICE").unwrap(), 2);

    let mut products = Vec::new();
    while reader.read() {
        let id: i32 = reader.get(0).unwrap();
        let name: String = reader.get_by_name("name").unwrap();
        let price: Option<f64> = reader.get(2).unwrap();
        let stock: Option<i64> = reader.get_by_name("Stock").unwrap();
        products.push((id, name, price, stock));
    }
    assert_eq!(
        products,
        vec![
            (1, "Widget".to_string(), Some(2.5), Some(100)),
            (2, "Gadget".to_string(), Some(10.0), None),
        ]
    );
    assert!(!reader.next_result());
}

#[test]
fn test_reader_multiple_results() {
    let connection = open_connection();
    seed(&connection);

    let mut reader = connection
        .create_command("SELECT Name FROM Products WHERE Stock > 50; SELECT 'x' AS y")
        .execute_reader()
        .unwrap();
    assert!(reader.read());
    assert_eq!(reader.get::<String>(0).unwrap(), "Widget");
    assert!(!reader.read());
    assert!(reader.next_result());
    assert_eq!(reader.get_name(0).unwrap(), "y");
    assert!(reader.read());
    assert_eq!(reader.get::<String>(0).unwrap(), "x");
    assert!(!reader.next_result());
}

#[test]
fn test_reader_type_errors() {
    let connection = open_connection();
    seed(&connection);

    let mut reader = connection
        .create_command("SELECT Price, Stock FROM Products WHERE Id = 3")
        .execute_reader()
        .unwrap();
    assert_eq!(reader.get_value(0), Err(Error::NoData));
    assert!(reader.read());
    assert_eq!(
        reader.get::<f64>(0).unwrap_err().to_string(),
        "Data is Null. This method or property cannot be called on Null values."
    );
    assert_eq!(
        reader.get::<i32>(1).unwrap_err().to_string(),
        "Unable to cast object of type 'System.Int64' to type 'System.Int32'."
    );
    assert!(reader.get::<DataValue>(0).unwrap().is_null());
}

#[test]
fn test_execute_scalar() {
    let connection = open_connection();
    seed(&connection);

    let command = connection.create_command("SELECT Name FROM Products WHERE Id = 2");
    assert_eq!(
        command.execute_scalar().unwrap(),
        Some(DataValue::nvarchar("Gadget"))
    );

    let command = connection.create_command("SELECT Name FROM Products WHERE Id = 99");
    assert_eq!(command.execute_scalar().unwrap(), None);

    let command = connection.create_command("INSERT Products (Id, Name) VALUES (4, N'Thing')");
    assert_eq!(command.execute_scalar().unwrap(), None);
}

#[test]
fn test_parameters() {
    let connection = open_connection();
    seed(&connection);

    let mut command = connection.create_command("SELECT Name FROM Products WHERE Id = @id");
    command.parameters_mut().add_with_value("@ID", 3);
    assert_eq!(
        command.execute_scalar().unwrap(),
        Some(DataValue::nvarchar("Gizmo"))
    );

    command.parameters_mut().get_mut("id").unwrap().set_value(1);
    assert_eq!(
        command.execute_scalar().unwrap(),
        Some(DataValue::nvarchar("Widget"))
    );

    let mut command = connection.create_command("SELECT @typed, @untyped");
    command
        .parameters_mut()
        .add(Parameter::with_type("typed", DataType::BigInt, 5));
    command.parameters_mut().add_with_value("untyped", None::<i32>);
    let mut reader = command.execute_reader().unwrap();
    assert!(reader.read());
    assert_eq!(reader.get_value(0).unwrap(), &DataValue::bigint(5));
    assert_eq!(
        reader.get_value(1).unwrap(),
        &DataValue::null(DataType::NVarChar)
    );

    let command = connection.create_command("SELECT @missing");
    assert_eq!(
        command.execute_scalar().unwrap_err().to_string(),
        "Must declare the scalar variable \"@missing\"."
    );
}

#[test]
fn test_closed_connection() {
    let connection = Connection::new(Arc::new(Simulation::new()));
    assert_eq!(connection.state(), ConnectionState::Closed);
    let command = connection.create_command("SELECT 1");
    assert_eq!(
        command.execute_non_query().unwrap_err().to_string(),
        "ExecuteNonQuery requires an open and available Connection. The connection's current state is closed."
    );

    resolve(connection.open_async());
    assert_eq!(connection.state(), ConnectionState::Open);
    assert!(command.execute_non_query().is_ok());

    resolve(connection.close_async());
    assert!(matches!(
        command.execute_scalar(),
        Err(Error::ConnectionClosed("ExecuteScalar"))
    ));

    let unbound = Command::new("SELECT 1");
    assert!(matches!(
        unbound.execute_reader(),
        Err(Error::ConnectionNotInitialized("ExecuteReader"))
    ));
}

#[test]
fn test_async_methods_complete_immediately() {
    let connection = open_connection();
    let command = connection.create_command("CREATE TABLE t (v int); INSERT t VALUES (1), (2)");
    assert_eq!(resolve(command.execute_non_query_async()).unwrap(), 2);

    let command = connection.create_command("SELECT v FROM t WHERE v > 1");
    assert_eq!(
        resolve(command.execute_scalar_async()).unwrap(),
        Some(DataValue::int(2))
    );
    let mut reader = resolve(command.execute_reader_async()).unwrap();
    assert!(reader.read());
}

#[test]
fn test_transactions() {
    let simulation = Arc::new(Simulation::new());
    let connection = Connection::new(Arc::clone(&simulation));
    let other = Connection::new(Arc::clone(&simulation));
    connection.open();
    other.open();

    let transaction = connection.begin_transaction().unwrap();
    let mut command = connection.create_command("CREATE TABLE t (v int)");
    command.set_transaction(Some(transaction.clone())).unwrap();
    assert_eq!(command.execute_non_query().unwrap(), -1);

    let mut foreign = other.create_command("SELECT 1");
    assert_eq!(
        foreign.set_transaction(Some(transaction.clone())).unwrap_err().to_string(),
        "The transaction is either not associated with the current connection or has been completed."
    );
    foreign.set_transaction(None).unwrap();

    transaction.rollback().unwrap();
    assert!(transaction.is_completed());
    assert_eq!(transaction.commit(), Err(Error::TransactionCompleted));

    // Rollback does not undo anything
    let rows = other
        .create_command("SELECT * FROM t")
        .execute_reader()
        .unwrap();
    assert_eq!(rows.field_count(), 1);

    command.set_command_text("INSERT t VALUES (1)");
    assert_eq!(command.execute_non_query(), Err(Error::TransactionMismatch));
}

#[test]
fn test_errors_report_sql_server_numbers() {
    let connection = open_connection();
    let cases = [
        ("SELECT FROM", 156),
        ("SELECT * FROM nowhere", 208),
        ("SELECT nothing", 207),
        ("SELECT 1 / 0", 8134),
    ];
    for (text, number) in cases {
        let err = connection
            .create_command(text)
            .execute_scalar()
            .unwrap_err();
        assert_eq!(err.number(), Some(number), "{}: {}", text, err);
    }
}
