mod bufreader;
