pub mod echo_server;
